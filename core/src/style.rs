use std::collections::HashMap;

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::model::{ExecutionResult, Problem, TestCaseResult};
use crate::testing::Verdict;

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                AC => Color::Green,
                WA => Color::Yellow,
                TLE => Color::Red,
                RE => Color::Magenta,
                IE => Color::Blue,
            };
        }

        let (r, g, b) = match self {
            AC => (30, 180, 40),
            WA => (210, 138, 4),
            TLE => (220, 42, 42),
            RE => (171, 40, 200),
            IE => (60, 90, 210),
        };
        Color::TrueColor { r, g, b }
    }
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

pub fn verdict_icon(verdict: Verdict) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", verdict)
        .on_color(verdict.color())
        .bold()
        .color(fg)
}

pub fn print_problem_line(p: &Problem) {
    println!(
        "{:<20} {:<8} {} {}",
        p.id.bold(),
        p.difficulty,
        p.title,
        format!("[{}s]", p.time_limit).dimmed(),
    );
}

pub fn print_problem_detail(p: &Problem) {
    println!("{} ({}, {}s)", p.title.bold(), p.difficulty, p.time_limit);
    println!(
        "{} {}()",
        "Entry point:".dimmed(),
        p.entry_point.function.cyan()
    );
    println!("\n{}\n", p.description);
    println!("{}\n{}", "[sample input]".cyan().bold(), p.sample_input);
    println!("{}\n{}", "[sample output]".cyan().bold(), p.sample_output);
}

pub fn print_testcase_line(res: &TestCaseResult) {
    println!(
        "{}",
        format!(
            "Testcase {} ... {}{} [{}ms]",
            res.test_case,
            self::verdict_icon(res.verdict),
            " ".repeat(3usize.saturating_sub(res.verdict.to_string().len())),
            res.execution_time.as_millis(),
        )
        .cyan()
    );
}

pub fn print_execution_summary(result: &ExecutionResult) {
    let bar = "-".repeat(5);
    print!("{} ", bar);

    let count: HashMap<Verdict, usize> =
        result
            .test_results
            .iter()
            .fold(HashMap::new(), |mut count, r| {
                *count.entry(r.verdict).or_default() += 1;
                count
            });

    let num_total_test = result.total_tests;
    let num_passed = result.total_passed;
    let num_failed = num_total_test - num_passed;

    if result.success {
        let msg = format!("All {} tests passed ✨", num_total_test);
        print!("{}", msg.green());
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let mut failures: Vec<_> = count
            .iter()
            .filter(|(&verdict, _)| verdict != Verdict::AC)
            .collect();
        failures.sort_by_key(|(verdict, _)| verdict.to_string());

        let detail_msg = failures
            .into_iter()
            .map(|(&verdict, &cnt)| {
                format!(
                    "{}{}{}",
                    self::verdict_icon(verdict),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        print!("{} ({})", summary_msg.bright_red(), detail_msg);
    }

    println!(
        " {} {}",
        format!("[{:.3}s]", result.execution_time.as_secs_f64()).dimmed(),
        bar
    );
}

pub fn print_testcase_detail(res: &TestCaseResult) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    let cols = cols as usize;

    const BOLD_LINE: &str = "━";
    const THIN_LINE: &str = "─";

    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    println!(
        "\n{}: {} [{}ms]\n{}",
        format!("Testcase {}", res.test_case)
            .color(Color::BrightYellow)
            .bold(),
        self::verdict_icon(res.verdict),
        res.execution_time.as_millis(),
        bold_bar,
    );

    fn print_sub_title(s: &str, cols: usize) {
        println!(
            "{}{}",
            s.cyan().bold(),
            THIN_LINE
                .repeat(cols.saturating_sub(s.len() + 1))
                .bright_black(),
        )
    }

    fn print_text(s: &str) {
        if s.is_empty() {
            println!("{}", "<EMPTY>".magenta().dimmed());
        } else {
            println!("{}", s);
        }
    }

    print_sub_title("[input]", cols);
    print_text(&res.input);

    print_sub_title("[expected]", cols);
    print_text(&res.expected_output);

    print_sub_title("[actual]", cols);
    print_text(&res.actual_output);

    if let Some(error) = &res.error {
        print_sub_title("[error]", cols);
        println!("{}", error.bright_red());
    }

    println!("{}", bold_bar);
}
