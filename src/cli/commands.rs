use std::path::{Path, PathBuf};

use crate::app::{AppContext, DirscoutError, Result};
use crate::domain::{find_by_name, CompanyRecord, DirectoryEntry, ScoringResult};
use crate::export;
use crate::matcher::ScoringMode;
use crate::session::SearchSession;

use super::SearchArgs;

pub async fn list_industries(ctx: &AppContext) -> Result<()> {
    println!("Fetching industries...");
    let industries = ctx.scraper.get_industries().await;
    print_entries(&industries, "No industries found");
    Ok(())
}

pub async fn list_countries(ctx: &AppContext, industry: &str) -> Result<()> {
    let url = if industry.starts_with("http://") || industry.starts_with("https://") {
        industry.to_string()
    } else {
        let industries = ctx.scraper.get_industries().await;
        find_by_name(&industries, industry)
            .map(|e| e.url.clone())
            .ok_or_else(|| DirscoutError::NotFound(format!("industry {:?}", industry)))?
    };

    println!("Fetching locations from {}...", url);
    let countries = ctx.scraper.get_countries(&url).await;
    print_entries(&countries, "No locations found");
    Ok(())
}

pub async fn scrape(
    ctx: &AppContext,
    url: &str,
    max: Option<u32>,
    output: Option<&Path>,
) -> Result<()> {
    let max = max.map_or(ctx.config.scraper.max_results, |m| m as usize);
    let outcome = ctx.scraper.scrape_with_outcome(url, max).await?;

    if outcome.records.is_empty() {
        println!("No companies found or scraper was blocked.");
        return Ok(());
    }

    print_companies(&outcome.records);
    println!(
        "\n{} companies from {} pages ({:?})",
        outcome.records.len(),
        outcome.pages,
        outcome.stop
    );

    if let Some(path) = output {
        export::write(path, &outcome.records)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

pub async fn search(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let mut session = SearchSession::new();

    println!("Fetching industries...");
    if session.load_industries(&ctx.scraper).await.is_empty() {
        println!("No industries found; the directory may be unavailable.");
        return Ok(());
    }

    let count = session
        .select_industry(&ctx.scraper, &args.industry)
        .await?
        .len();
    let industry = session
        .selected_industry()
        .map(|e| e.name.clone())
        .unwrap_or_default();
    println!("{} locations for {}", count, industry);

    let country = session.select_country(&args.country)?.name.clone();

    let max = args
        .max
        .map_or(ctx.config.scraper.max_results, |m| m as usize);
    println!("Scraping companies in {}, {}...", industry, country);
    let found = session.search(&ctx.scraper, max).await?.len();

    if found == 0 {
        println!("No companies found or scraper was blocked. Try a different industry or location.");
        return Ok(());
    }
    println!("Found {} companies!", found);

    if let Some(ref path) = args.profile {
        let profile = std::fs::read_to_string(path)?;
        if profile.trim().is_empty() {
            eprintln!("Profile {} is empty, skipping AI matching", path.display());
        } else {
            let matcher = ctx.matcher(args.api_key.as_deref());
            let mode = args.mode.unwrap_or(ctx.config.matcher.mode);
            if !matcher.has_credentials() {
                eprintln!(
                    "No API key given; companies will be marked \"{}\"",
                    missing_key_label(mode)
                );
            }

            println!("Analyzing matches...");
            session
                .analyze(
                    &matcher,
                    &profile,
                    mode,
                    ctx.config.matcher.batch_size,
                    |done, total| eprint!("\r  scored {}/{}", done, total),
                )
                .await;
            eprintln!();
        }
    }

    print_companies(&session.results);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export::default_file_name(&industry, &country)));
    export::write(&output, &session.results)?;
    println!("\nSaved {} companies to {}", session.results.len(), output.display());

    Ok(())
}

/// Reasoning every company ends up with when scoring runs without a key
fn missing_key_label(mode: ScoringMode) -> String {
    match mode {
        ScoringMode::Single => ScoringResult::missing_key().reasoning,
        ScoringMode::Batch => ScoringResult::ai_error().reasoning,
    }
}

fn print_entries(entries: &[DirectoryEntry], empty_message: &str) {
    if entries.is_empty() {
        println!("{}", empty_message);
        return;
    }

    for entry in entries {
        println!("{}\n  {}", entry.name, entry.url);
    }
}

fn print_companies(records: &[CompanyRecord]) {
    for company in records {
        println!("\n{}", company.name);
        println!("  Website:  {}", company.url);
        println!("  LinkedIn: {}", company.linkedin);
        if let Some(score) = company.match_score {
            println!("  Match:    {}%", score);
        }
        if let Some(ref reasoning) = company.reasoning {
            println!("  {}", reasoning);
        }
    }
}
