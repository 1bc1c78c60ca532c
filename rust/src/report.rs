//! Text formats consumed by the plotting scripts.
//!
//! Step functions are written as Python tuple literals,
//! `('<label>', <initial>, {<t0>:<v0>, <t1>:<v1>, })`, one per line, so the
//! plotting side can read them back with `ast.literal_eval`.

use std::fmt::Write;

use crate::models::RunStats;
use crate::step_function::StepFunction;

/// Format one step function as a labelled Python tuple literal, newline terminated.
pub fn format_step_function(label: &str, f: &StepFunction) -> String {
    let mut jumps = String::from("{");
    for (time, value) in f.jumps() {
        // Debug keeps a decimal point on whole numbers, which literal_eval reads as float
        let _ = write!(jumps, "{:?}:{:?}, ", time, value);
    }
    jumps.push('}');
    format!("('{}', {:.6}, {})\n", label, f.initial_value(), jumps)
}

/// The power log of one run: the cap followed by the measured usage.
pub fn format_power_log(power_cap: &StepFunction, power_used: &StepFunction) -> String {
    let mut log = format_step_function("power cap", power_cap);
    log.push_str(&format_step_function("power used", power_used));
    log
}

/// Key/value lines read by the SLR scatter plot, one `'key' value` pair per line.
pub fn format_slr_plot_data(stats: &RunStats) -> String {
    format!(
        "'application' '{}'\n'size' '{}'\n'optimalMakespan' {:.6}\n'makespan' {:.6}\n'powerDipFraction' {:.6}\n",
        stats.application, stats.size, stats.optimal_makespan, stats.makespan, stats.dip_fraction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_step_function() {
        let mut f = StepFunction::new(0.0);
        f.add_jump(10.0, 50.0).unwrap();
        f.add_jump(0.0, 100.0).unwrap();
        f.add_jump(2.5, 75.25).unwrap();

        assert_eq!(
            format_step_function("power cap", &f),
            "('power cap', 0.000000, {0.0:100.0, 2.5:75.25, 10.0:50.0, })\n"
        );
    }

    #[test]
    fn test_format_empty_step_function() {
        assert_eq!(
            format_step_function("power used", &StepFunction::new(3.5)),
            "('power used', 3.500000, {})\n"
        );
    }

    #[test]
    fn test_format_power_log_order() {
        let cap = StepFunction::from_pairs(0.0, [(0.0, 10.0)]).unwrap();
        let used = StepFunction::from_pairs(0.0, [(1.0, 4.0)]).unwrap();
        let log = format_power_log(&cap, &used);
        let lines: Vec<&str> = log.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("('power cap'"));
        assert!(lines[1].starts_with("('power used'"));
    }

    #[test]
    fn test_format_slr_plot_data() {
        let stats = RunStats {
            application: "MONTAGE".to_string(),
            size: 50,
            dip_fraction: 0.5,
            optimal_makespan: 22.5,
            makespan: 30.0,
        };
        assert_eq!(
            format_slr_plot_data(&stats),
            "'application' 'MONTAGE'\n'size' '50'\n'optimalMakespan' 22.500000\n\
             'makespan' 30.000000\n'powerDipFraction' 0.500000\n"
        );
    }
}
