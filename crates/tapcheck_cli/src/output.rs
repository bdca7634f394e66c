use anyhow::Result;
use colored::*;
use serde_json::json;
use tapcheck_core::Schema;
use tapcheck_report::Report;

/// Failure rows printed per source before the rest is summarized.
const MAX_FAILURES_SHOWN: usize = 20;

pub fn print_run_summary(reports: &[Report], format: &str) -> Result<()> {
    match format {
        "json" => print_json_summary(reports),
        _ => {
            print_text_summary(reports);
            Ok(())
        }
    }
}

fn print_text_summary(reports: &[Report]) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION SUMMARY".bold());
    println!("{}", "═".repeat(60));

    println!(
        "\n  {:<28} {:>7} {:>9} {:>11}",
        "Database".bold(),
        "Errors".bold(),
        "Warnings".bold(),
        "Unexpected".bold()
    );
    for report in reports {
        for row in report.summary_rows() {
            let errors = if row.errors > 0 {
                row.errors.to_string().red().bold()
            } else {
                row.errors.to_string().green()
            };
            println!(
                "  {:<28} {:>7} {:>9} {:>11}",
                row.database, errors, row.warnings, row.unexpected_types
            );
        }
    }

    for report in reports {
        if let Some(error) = &report.source_error {
            println!(
                "\n{} {}",
                "✗".red().bold(),
                format!("{} unavailable: {}", report.source_name, error).red()
            );
            continue;
        }
        print_failures(report);
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed == 0 {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "No errors found".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            format!("{} of {} source(s) have errors", failed, reports.len())
                .red()
                .bold()
        );
    }
    println!("{}", "═".repeat(60));
}

fn print_failures(report: &Report) {
    for mode_outcome in &report.outcomes {
        let cases = &mode_outcome.outcome.failure_cases;
        if cases.is_empty() {
            continue;
        }

        println!(
            "\n{}",
            format!("Failures in {} ({}):", report.source_name, mode_outcome.mode)
                .red()
                .bold()
        );
        println!(
            "  {:>6}  {:<24} {:<24} {}",
            "index", "column", "check", "failure_case"
        );
        for case in cases.iter().take(MAX_FAILURES_SHOWN) {
            println!(
                "  {:>6}  {:<24} {:<24} {}",
                case.index.map(|i| i.to_string()).unwrap_or_default(),
                case.column.as_deref().unwrap_or(""),
                case.check.to_string(),
                case.failure_case
            );
        }
        if cases.len() > MAX_FAILURES_SHOWN {
            println!(
                "  ... and {} more",
                (cases.len() - MAX_FAILURES_SHOWN).to_string().yellow()
            );
        }
    }
}

fn print_json_summary(reports: &[Report]) -> Result<()> {
    let output = json!({
        "passed": reports.iter().all(Report::passed),
        "summary": reports.iter().flat_map(Report::summary_rows).collect::<Vec<_>>(),
        "reports": reports,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_schema(schema: &Schema, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(schema)?);
        return Ok(());
    }

    println!("\n{}", "Schema Summary:".bold());
    println!("  Name:    {}", schema.name);
    println!(
        "  Mode:    {}",
        if schema.strict { "strict" } else { "permissive" }
    );
    println!("  Fields:  {}", schema.fields.len());

    println!(
        "\n  {:<20} {:<9} {:<9} {:<9} {:<7} {}",
        "field", "type", "required", "nullable", "coerce", "duplicates"
    );
    for field in &schema.fields {
        println!(
            "  {:<20} {:<9} {:<9} {:<9} {:<7} {}",
            field.name,
            field.field_type.as_str(),
            yes_no(field.required),
            yes_no(field.nullable),
            yes_no(field.coerce),
            yes_no(field.report_duplicates)
        );
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
