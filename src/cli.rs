// src/cli.rs
use crate::app_log;
use crate::auth::{AuthService, RegistrationForm, Route};
use crate::core::{ApiClient, JobBoardApi, SessionContext};
use crate::listing::{ListingConfig, ListingController, ListingState};
use crate::messages::{APPLY_LINK_MISSING, NO_JOBS};
use crate::popular::fetch_popular;
use crate::profile::{ProfileEditor, ProfileForm};
use crate::status::{probe, ProbeOutcome};
use crate::types::{FilterField, Job, RemoteFilter};
use crate::utils::{format_date, format_employment_type, truncate};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

const DESCRIPTION_PREVIEW_CHARS: usize = 280;

#[derive(Parser)]
#[command(name = "carimagang")]
#[command(about = "Browse internship listings from the Cari Magang job board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config.yaml (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login {
        /// Account email; falls back to the remembered one
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: String,
        /// Remember the email for the next login
        #[arg(long)]
        remember: bool,
    },
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Search the internship listing (requires login)
    Jobs {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        employment_type: Option<String>,
        /// any, remote or onsite
        #[arg(long, default_value = "any")]
        remote: RemoteFilter,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        /// Print descriptions and organization details
        #[arg(long)]
        details: bool,
    },
    /// Featured jobs shown on the landing page
    Popular,
    /// Organizations available as a listing filter (requires login)
    Organizations,
    /// Update name, email or password (requires login)
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Check connectivity to the backend
    Status,
}

pub async fn handle_command(
    command: Command,
    api: Arc<ApiClient>,
    session: SessionContext,
    listing: ListingConfig,
) -> Result<()> {
    match command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let auth = AuthService::new(api, session);
            let email = match email.or(auth.remembered_email()?) {
                Some(email) => email,
                None => bail!("No email given and none remembered; pass --email"),
            };
            let logged_in = auth.login(&email, &password, remember).await?;
            println!("✅ Logged in as {}", logged_in.session.user.name);
            println!("   Continue at {}", logged_in.route.path());
        }

        Command::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            let auth = AuthService::new(api, session);
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
            };
            let registered = auth.register(&form).await?;
            println!("✅ {}", registered.notice);
        }

        Command::Logout => {
            let auth = AuthService::new(api, session);
            let route = auth.logout()?;
            println!("Logged out, back to {}", route.path());
        }

        Command::Whoami => match session.session()? {
            Some(current) => {
                println!("[{}] {}", current.user.initial(), current.user.name);
                println!("    {}", current.user.email);
            }
            None => println!("Not logged in"),
        },

        Command::Jobs {
            search,
            location,
            organization,
            employment_type,
            remote,
            page,
            limit,
            details,
        } => {
            let config = ListingConfig {
                page_size: limit.unwrap_or(listing.page_size),
                ..listing
            };
            let mut controller = ListingController::new(api, session, config);
            if controller.mount().await? != Route::Dashboard {
                bail!("Not logged in; run `carimagang login` first");
            }

            let filters = [
                (FilterField::Search, search),
                (FilterField::Location, location),
                (FilterField::Organization, organization),
                (FilterField::EmploymentType, employment_type),
                (FilterField::Remote, Some(remote.as_param().to_string())),
            ];
            for (field, value) in filters {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    controller.set_filter(field, value)?;
                }
            }
            if page != 1 {
                controller.set_page(page)?;
            }
            controller.fetch().await?;

            let state = controller.snapshot();
            if let Some(error) = &state.error {
                println!("❌ {}", error);
                bail!("{}", error);
            }
            print_listing(&state, details);
        }

        Command::Popular => {
            let jobs = fetch_popular(api.as_ref()).await;
            if jobs.is_empty() {
                println!("{}", NO_JOBS);
            }
            for job in &jobs {
                print_job(job, false);
            }
        }

        Command::Organizations => {
            let Some(token) = session.token()? else {
                bail!("Not logged in; run `carimagang login` first");
            };
            let organizations = api.organizations(&token).await?;
            for org in organizations {
                println!("{:<40} {:>5}", org.organization, org.job_count);
            }
        }

        Command::Profile {
            name,
            email,
            current_password,
            new_password,
            confirm_password,
        } => {
            let editor = ProfileEditor::new(api, session);
            let current = editor.form()?;
            let form = ProfileForm {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
                current_password: current_password.unwrap_or_default(),
                new_password: new_password.unwrap_or_default(),
                confirm_password: confirm_password.unwrap_or_default(),
            };
            let saved = editor.submit(&form).await?;
            println!("✅ {}", saved.notice);
            if let Some(user) = saved.user {
                println!("   {} <{}>", user.name, user.email);
            }
        }

        Command::Status => {
            let token = session.token()?;
            println!("Backend: {}", api.base_url());
            let results = probe(api.as_ref(), token.as_deref()).await;
            for result in &results {
                let (mark, detail) = match &result.outcome {
                    ProbeOutcome::Ok(detail) => ("✅", detail.as_str()),
                    ProbeOutcome::Failed(detail) => ("❌", detail.as_str()),
                    ProbeOutcome::Skipped(reason) => ("⏭️", *reason),
                };
                println!("{} {:<14} {:<32} {}", mark, result.name, result.endpoint, detail);
            }
            if results.iter().any(|r| !r.is_ok()) {
                app_log!(warn, "status probe reported failures");
                bail!("One or more endpoints are unreachable");
            }
        }
    }

    Ok(())
}

fn print_listing(state: &ListingState, details: bool) {
    println!("{}", state.summary());
    if state.items.is_empty() {
        println!("{}", NO_JOBS);
        return;
    }

    for job in &state.items {
        print_job(job, details);
    }

    if let Some(pager) = state.pager() {
        let buttons: Vec<String> = pager
            .pages
            .iter()
            .map(|p| {
                if *p == pager.current {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        println!(
            "{} {} {}",
            if pager.has_previous { "«" } else { " " },
            buttons.join(" "),
            if pager.has_next { "»" } else { " " }
        );
        println!("{}", state.page_label());
    }
}

fn print_job(job: &Job, details: bool) {
    println!();
    println!(
        "■ {}",
        job.title.as_deref().unwrap_or("(untitled)")
    );
    println!(
        "  {} · {}",
        job.organization.as_deref().unwrap_or("-"),
        job.location_label()
    );

    let mut tags = Vec::new();
    if let Some(kind) = job.employment_type.as_deref() {
        tags.push(format_employment_type(kind));
    }
    if job.remote_derived == Some(true) {
        tags.push("Remote".to_string());
    }
    if let Some(seniority) = job.seniority.as_deref() {
        tags.push(seniority.to_string());
    }
    if !tags.is_empty() {
        println!("  {}", tags.join(" | "));
    }

    if let Some(posted) = job.date_posted.as_deref() {
        print!("  Diposting {}", format_date(posted));
        if let Some(until) = job.date_validthrough.as_deref() {
            print!(" · Berlaku hingga {}", format_date(until));
        }
        println!();
    }
    println!("  Sumber: {}", job.source_label());
    match job.apply_url() {
        Some(url) => println!("  Apply: {}", url),
        None => println!("  {}", APPLY_LINK_MISSING),
    }

    if details {
        if let Some(industry) = job.organization_industry.as_deref() {
            println!("  Industri: {}", industry);
        }
        if let Some(hq) = job.organization_headquarters.as_deref() {
            println!("  Kantor pusat: {}", hq);
        }
        if let Some(description) = job.description.as_deref() {
            println!("  {}", truncate(description.trim(), DESCRIPTION_PREVIEW_CHARS));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::FETCH_JOBS_ERROR;
    use crate::types::{Session, User};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_jobs_filters() {
        let cli = Cli::try_parse_from([
            "carimagang",
            "jobs",
            "--search",
            "data analyst",
            "--remote",
            "onsite",
            "--page",
            "3",
        ])
        .unwrap();

        match cli.command {
            Command::Jobs {
                search,
                remote,
                page,
                limit,
                ..
            } => {
                assert_eq!(search.as_deref(), Some("data analyst"));
                assert_eq!(remote, RemoteFilter::OnSite);
                assert_eq!(page, 3);
                assert_eq!(limit, None);
            }
            _ => panic!("expected jobs command"),
        }
    }

    #[tokio::test]
    async fn failed_listing_fetch_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = Arc::new(
            ApiClient::new(format!("http://{}", addr), std::time::Duration::from_secs(2)).unwrap(),
        );
        let session = SessionContext::in_memory();
        session
            .save(&Session {
                token: "tok".to_string(),
                user: User::default(),
            })
            .unwrap();
        let listing = ListingConfig {
            page_size: 10,
            search_debounce: std::time::Duration::ZERO,
        };

        let cli = Cli::try_parse_from(["carimagang", "jobs"]).unwrap();
        let err = handle_command(cli.command, api, session, listing)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), FETCH_JOBS_ERROR);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["carimagang", "status", "--config", "alt.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
        assert!(matches!(cli.command, Command::Status));
    }
}
