//! rust_omics_eda command-line interface

use clap::Parser;
use log::{info, warn, LevelFilter};

use rust_omics_eda::cli::{Cli, Commands};
use rust_omics_eda::prelude::*;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Volcano {
            input,
            padj,
            lfc,
            limit,
            json,
        } => run_volcano(&input, padj, lfc, limit, json),
        Commands::Clinical {
            input,
            column,
            json,
        } => run_clinical(&input, column.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is_data_load() {
            eprintln!("Please place the CSV file with the expected header in the `data/` folder.");
        }
        std::process::exit(1);
    }
}

fn run_volcano(input: &str, padj: f64, lfc: f64, limit: usize, json: bool) -> Result<()> {
    let thresholds = Thresholds::new(padj, lfc)?;
    let limit = (limit > 0).then_some(limit);

    info!("Loading RNA-seq results from: {}", input);
    let report = volcano_report(input, thresholds, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.title);
    println!();
    print!("{}", report.summary);
    println!();
    println!(
        "Guides: y = {:.3}, x = {} / {}",
        report.guides.neg_log10_padj, report.guides.lfc_low, report.guides.lfc_high
    );
    println!("Y range: [{}, {:.1}]", report.y_range.0, report.y_range.1);
    println!();

    println!("Significant Genes Data");
    println!(
        "{:<20}\t{:<12}\t{:>12}\t{:>14}\t{:>12}\t{}",
        "ensembl_id", "symbol", "baseMean", "log2FoldChange", "padj", "Significance"
    );
    for gene in &report.significant_genes {
        println!(
            "{:<20}\t{:<12}\t{:>12.2}\t{:>14.2}\t{:>12.2e}\t{}",
            gene.ensembl_id,
            gene.symbol,
            gene.base_mean,
            gene.log2_fold_change,
            gene.padj,
            gene.significance
        );
    }
    if report.significant_genes.len() < report.summary.significant {
        println!(
            "... {} more (omit --limit to show all)",
            report.summary.significant - report.significant_genes.len()
        );
    }
    println!("Found {} significant genes.", report.summary.significant);
    Ok(())
}

fn run_clinical(input: &str, column: Option<&str>, json: bool) -> Result<()> {
    info!("Loading clinical data from: {}", input);
    let table = load_clinical(input)?;
    let report = ClinicalReport::from_table(&table);

    // A bad explorer column only loses that panel
    let deep_dive = column.and_then(|c| match explore_column(&table, c) {
        Ok(dist) => Some(dist),
        Err(e) => {
            warn!("Cannot explore column '{}': {}", c, e);
            None
        }
    });

    if json {
        let value = serde_json::json!({
            "report": report,
            "deep_dive": deep_dive,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_clinical_report(&report);
    if let Some(dist) = &deep_dive {
        print_distribution(dist);
    } else if column.is_none() {
        println!("Columns available to explore (--column): {}", report.columns.join(", "));
    }
    Ok(())
}

fn print_clinical_report(report: &ClinicalReport) {
    print!("{}", report.overview);
    println!();

    println!("Patient Demographics");
    match &report.age_group_by_gender {
        Some(cells) => {
            for c in cells {
                println!("  {:<12} {:<3} {}", c.group, c.gender, c.count);
            }
        }
        None => println!("  Age group by gender: N/A"),
    }
    match &report.gender_breakdown {
        Some(shares) => {
            for s in shares {
                println!("  {:<3} {} ({:.1}%)", s.category, s.count, s.fraction * 100.0);
            }
        }
        None => println!("  Gender breakdown: N/A"),
    }
    println!();

    println!("Hospitalization Metrics");
    match &report.los_by_gender {
        Some(groups) => {
            for g in groups {
                let s = &g.stats;
                println!(
                    "  LOS [{}] n={} median={:.1} IQR=[{:.1}, {:.1}] whiskers=[{:.1}, {:.1}] outliers={}",
                    g.group,
                    s.n,
                    s.median,
                    s.q1,
                    s.q3,
                    s.lower_whisker,
                    s.upper_whisker,
                    s.outliers.len()
                );
            }
        }
        None => println!("  LOS distribution: N/A"),
    }
    match &report.surgery_histogram {
        Some(bars) => {
            for b in bars {
                println!("  Surgeries={} patients={}", b.surgeries, b.patients);
            }
        }
        None => println!("  Surgery count: N/A"),
    }
    println!();

    println!("Medication Usage (Top 15)");
    if report.medication_usage.is_empty() {
        println!("  No medication count columns found to display.");
    }
    for m in &report.medication_usage {
        println!("  {:<24} {}", m.medication, m.total);
    }
    println!();
}

fn print_distribution(dist: &ColumnDistribution) {
    println!("{}", dist.title());
    match dist {
        ColumnDistribution::Categorical { counts, .. } => {
            for c in counts {
                match &c.gender {
                    Some(g) => println!("  {:<20} {:<3} {}", c.value, g, c.count),
                    None => println!("  {:<20} {}", c.value, c.count),
                }
            }
        }
        ColumnDistribution::Numeric {
            histogram,
            box_stats,
            ..
        } => {
            for bin in histogram {
                println!("  [{:>10.2}, {:>10.2}) {}", bin.lower, bin.upper, bin.count);
            }
            if let Some(s) = box_stats {
                println!(
                    "  n={} mean={:.2} median={:.2} Q1={:.2} Q3={:.2} outliers={:?}",
                    s.n, s.mean, s.median, s.q1, s.q3, s.outliers
                );
            }
        }
    }
}
