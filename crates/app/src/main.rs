use chrono::Utc;
use clap::{Parser, Subcommand};
use internship_match_core::{
    filter_skills, load_reference_data, ApiClient, ClientConfig, DisplayRow, EducationLevel,
    FileSettings, LanguagePreference, Orchestrator, Outcome, Profile, RequestControl,
    ResultsView, SearchForm, SubmitError, DEFAULT_API_BASE_URL, MAX_SKILLS, SUPPORTED_LANGUAGES,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "internship-match", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Matching service base URL
    #[arg(long, env = "INTERNSHIP_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// File holding persisted preferences such as the interface language
    #[arg(
        long,
        env = "INTERNSHIP_SETTINGS_FILE",
        default_value = "internship-match-settings.json"
    )]
    settings_file: String,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the service root and health endpoints.
    Health,
    /// Print the sectors, skills, locations and statistics offered by the service.
    Catalog,
    /// Print autocomplete matches for a partial skill name.
    Suggest {
        /// Partial skill name.
        #[arg(long)]
        query: String,
        /// Skills already chosen; they are left out of the matches.
        #[arg(long = "chosen")]
        chosen: Vec<String>,
    },
    /// Submit a profile and print the ranked recommendations.
    Search {
        /// Education level, e.g. "B.Tech".
        #[arg(long)]
        education: Option<String>,
        /// Skill to include; repeat for more (up to 10).
        #[arg(long = "skill")]
        skills: Vec<String>,
        /// Preferred sector; repeat for more.
        #[arg(long = "sector")]
        sectors: Vec<String>,
        /// Preferred state.
        #[arg(long)]
        state: Option<String>,
        /// Number of recommendations: 3, 5, 7 or 10.
        #[arg(long, default_value = "5")]
        max_results: u8,
        /// Abandon the search after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Accept skills that are not in the service's skill list.
        #[arg(long, default_value_t = false)]
        allow_unlisted: bool,
    },
    /// Show or change the interface language.
    Lang {
        /// Language code to switch to.
        code: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        api_url = %cli.api_url,
        started_at = %Utc::now().to_rfc3339(),
        "internship-match boot"
    );

    match cli.command {
        Command::Health => {
            let client = ApiClient::new(&ClientConfig::with_base_url(&cli.api_url))?;
            let root = client.test_connection().await.map_err(|error| {
                anyhow::anyhow!(
                    "Cannot connect to the API server at {}: {error}",
                    client.base_url()
                )
            })?;
            println!("root: {root}");
            let health = client
                .health()
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("health: {health}");
        }
        Command::Catalog => {
            let client = ApiClient::new(&ClientConfig::with_base_url(&cli.api_url))?;
            let data = load_reference_data(&client).await;

            println!("sectors ({}): {}", data.sectors.len(), data.sectors.join(", "));
            println!("skills: {}", data.skills.len());
            println!(
                "locations: {} states, {} cities",
                data.locations.states.len(),
                data.locations.cities.len()
            );
            match data.stats {
                Some(stats) => println!(
                    "stats: internships={} sectors={} companies={} locations={}",
                    stats.total_internships,
                    stats.total_sectors,
                    stats.total_companies,
                    stats.total_locations
                ),
                None => println!("stats: unavailable"),
            }
        }
        Command::Suggest { query, chosen } => {
            let client = ApiClient::new(&ClientConfig::with_base_url(&cli.api_url))?;
            let data = load_reference_data(&client).await;
            let matches = filter_skills(&query, &data.skills, &chosen);

            if matches.is_empty() {
                println!("no matching skills for {query:?}");
            }
            for skill in matches {
                println!("{skill}");
            }
        }
        Command::Search {
            education,
            skills,
            sectors,
            state,
            max_results,
            timeout_secs,
            allow_unlisted,
        } => {
            let client = ApiClient::new(&ClientConfig::with_base_url(&cli.api_url))?;
            let mut orchestrator = Orchestrator::new(client);
            let reference = orchestrator.enter_search_screen().await.clone();

            let mut form = SearchForm::new();
            if let Some(education) = education {
                form.set_education(Some(education.parse::<EducationLevel>()?));
            }
            form.set_max_results(max_results)?;
            form.set_location_state(state.as_deref());
            for sector in &sectors {
                if !reference.sectors.is_empty() && !reference.sectors.contains(sector) {
                    warn!(%sector, "sector is not offered by the service");
                }
                form.toggle_sector(sector);
            }
            for skill in &skills {
                let listed = reference.skills.is_empty() || reference.skills.contains(skill);
                if !listed && !allow_unlisted {
                    anyhow::bail!(
                        "skill {skill:?} is not in the service's skill list (use --allow-unlisted to send it anyway)"
                    );
                }
                if !form.add_skill(skill) {
                    warn!(%skill, limit = MAX_SKILLS, "skill skipped (duplicate or limit reached)");
                }
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let control = RequestControl {
                timeout: timeout_secs.map(Duration::from_secs),
                cancel: Some(cancel),
            };

            match orchestrator.submit(&form, &control).await {
                Ok(Outcome::Results { .. }) => {
                    print_results(orchestrator.results_view());
                }
                Ok(_) => {
                    if let Some(notice) = orchestrator.notice() {
                        println!("{notice}");
                    }
                }
                Err(SubmitError::Invalid(error)) => {
                    anyhow::bail!(error);
                }
                Err(error) => return Err(error.into()),
            }
        }
        Command::Lang { code } => {
            let mut preference = LanguagePreference::new(FileSettings::open(&cli.settings_file)?);
            let mut changes = preference.subscribe();

            if let Some(code) = code {
                preference.set(&code)?;
            }
            if changes.has_changed().unwrap_or(false) {
                info!(lang = %changes.borrow_and_update().as_str(), "language changed");
            }

            let current = preference.current();
            let label = SUPPORTED_LANGUAGES
                .iter()
                .find(|(known, _)| *known == current)
                .map(|(_, label)| *label)
                .unwrap_or_default();
            println!("{current} ({label})");
        }
    }

    Ok(())
}

fn print_results(view: ResultsView) {
    match view {
        ResultsView::Empty => {
            println!(
                "We couldn't find any internships matching your criteria. Try adjusting your search parameters."
            );
        }
        ResultsView::Ranked { query, rows } => {
            if let Some(profile) = query {
                print_query(&profile);
            }
            println!("Found {} matches", rows.len());
            for row in rows {
                print_row(&row);
            }
        }
    }
}

fn print_query(profile: &Profile) {
    println!(
        "query: education={} skills={}",
        profile.education,
        profile.skills.join(", ")
    );
    if !profile.sectors.is_empty() {
        println!("  sectors={}", profile.sectors.join(", "));
    }
    if let Some(state) = &profile.location_state {
        println!("  state={state}");
    }
}

fn print_row(row: &DisplayRow) {
    println!(
        "[{}] {}% match ({}) {} @ {}",
        row.rank, row.score_percent, row.tier, row.title, row.company
    );
    println!(
        "  {} | {} | {} weeks | {} | {}",
        row.location, row.stipend, row.duration_weeks, row.sector, row.education_requirement
    );
    if !row.skills_required.is_empty() {
        println!("  skills: {}", row.skills_required.join(", "));
    }
    println!("  why: {}", row.reason);
    println!("  apply by {}: {}", row.apply_by, row.apply_url);
}
