use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FormController, FormEvent, HttpRegistrationTransport, RegistrationTransport, SubmitError,
    SubmitOutcome, ToastLevel,
};
use shared::domain::{
    ChurchBranch, EmploymentStatus, Field, MainGoal, OptionSet, ServeInterest, Skill, Track,
};
use tokio::sync::broadcast;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Fill in and send a program registration")]
struct Cli {
    /// Base URL of the registration relay.
    #[arg(long, env = "REGISTER_PROXY_URL", default_value = "http://127.0.0.1:8787")]
    proxy_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the answers and submit them once.
    Submit(Answers),
    /// Print the accepted values for every choice field.
    Options,
}

#[derive(clap::Args, Debug)]
struct Answers {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    branch: Option<ChurchBranch>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    employment_status: Option<EmploymentStatus>,
    /// Only used when the employment status is "Other".
    #[arg(long)]
    employment_other: Option<String>,
    #[arg(long)]
    main_goal: Option<MainGoal>,
    #[arg(long)]
    track: Option<Track>,
    #[arg(long)]
    skill: Option<Skill>,
    #[arg(long)]
    income_goal: Option<String>,
    #[arg(long)]
    serve_interest: Option<ServeInterest>,
    #[arg(long)]
    contribution: Option<String>,
    #[arg(long)]
    comments: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Options => print!("{}", options_listing()),
        Command::Submit(answers) => submit(&cli.proxy_url, answers).await?,
    }

    Ok(())
}

async fn submit(proxy_url: &str, answers: Answers) -> Result<()> {
    let controller = FormController::new(HttpRegistrationTransport::new(proxy_url)?);
    let mut events = controller.subscribe_events();

    fill_form(&controller, answers).await;
    let result = controller.submit().await;
    print_events(&mut events);
    finish(result)
}

/// Copies the answers given on the command line into the form.
async fn fill_form<T: RegistrationTransport>(controller: &FormController<T>, answers: Answers) {
    let text = [
        (Field::FullName, answers.full_name),
        (Field::Email, answers.email),
        (Field::Phone, answers.phone),
        (Field::IncomeGoal, answers.income_goal),
        (Field::Contribution, answers.contribution),
        (Field::Comments, answers.comments),
    ];
    for (field, value) in text {
        if let Some(value) = value {
            controller.update_field(field, value).await;
        }
    }
    select(controller, answers.branch).await;
    select(controller, answers.employment_status).await;
    select(controller, answers.main_goal).await;
    select(controller, answers.track).await;
    select(controller, answers.skill).await;
    select(controller, answers.serve_interest).await;

    if let Some(other) = answers.employment_other {
        if controller.snapshot().await.payload.employment_other_enabled() {
            controller.update_field(Field::EmploymentOther, other).await;
        } else {
            warn!("--employment-other ignored unless --employment-status is \"Other\"");
        }
    }
}

fn finish(result: Result<SubmitOutcome, SubmitError>) -> Result<()> {
    match result {
        Ok(SubmitOutcome::Submitted) => Ok(()),
        Ok(SubmitOutcome::AlreadyPending) => bail!("a submission is already in flight"),
        Err(SubmitError::Invalid(error)) => {
            let labels: Vec<&str> = error.missing_fields().iter().map(|f| f.label()).collect();
            bail!("missing required fields: {}", labels.join(", "))
        }
        Err(error) => Err(error.into()),
    }
}

async fn select<T: RegistrationTransport, O: OptionSet>(
    controller: &FormController<T>,
    option: Option<O>,
) {
    if let Some(option) = option {
        controller.select(option).await;
    }
}

fn print_events(events: &mut broadcast::Receiver<FormEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            FormEvent::Toast(toast) => match toast.level {
                ToastLevel::Success => println!("{}", toast.text),
                ToastLevel::Error => eprintln!("{}", toast.text),
            },
            FormEvent::Navigated(view) => tracing::debug!(?view, "view changed"),
        }
    }
}

fn options_listing() -> String {
    let mut out = String::new();
    list_set::<ChurchBranch>(&mut out);
    list_set::<EmploymentStatus>(&mut out);
    list_set::<MainGoal>(&mut out);
    list_set::<Track>(&mut out);
    list_set::<Skill>(&mut out);
    list_set::<ServeInterest>(&mut out);
    out
}

fn list_set<O: OptionSet>(out: &mut String) {
    out.push_str(O::FIELD.label());
    out.push_str(":\n");
    for option in O::all() {
        out.push_str(&format!("  {option}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::{fill_form, finish, options_listing, Cli, Command};
    use clap::Parser;
    use client_core::{
        FormController, HttpRegistrationTransport, SubmitError, SubmitOutcome, TransportError,
    };
    use shared::{domain::Field, error::ValidationError};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("args")
    }

    fn offline_controller() -> FormController<HttpRegistrationTransport> {
        let transport = HttpRegistrationTransport::new("http://127.0.0.1:9").expect("transport");
        FormController::new(transport)
    }

    #[tokio::test]
    async fn flags_land_in_their_fields() {
        let cli = parse(&[
            "register",
            "--proxy-url",
            "https://hic.example.org",
            "submit",
            "--full-name",
            "Jane Doe",
            "--branch",
            "GPC EDMONTON",
            "--email",
            "jane@example.com",
            "--phone",
            "780-555-0100",
            "--employment-status",
            "Other",
            "--employment-other",
            "Pastor",
            "--main-goal",
            "Career change",
            "--track",
            "IT Enthusiast",
            "--skill",
            "Cloud Computing",
            "--serve-interest",
            "Yes: I can volunteer",
            "--comments",
            "See you there",
        ]);
        assert_eq!(cli.proxy_url, "https://hic.example.org");
        let Command::Submit(answers) = cli.command else {
            panic!("expected submit");
        };

        let controller = offline_controller();
        fill_form(&controller, answers).await;
        let payload = controller.snapshot().await.payload.clone();
        assert_eq!(payload.get(Field::FullName), "Jane Doe");
        assert_eq!(payload.get(Field::Branch), "GPC EDMONTON");
        assert_eq!(payload.get(Field::EmploymentOther), "Pastor");
        assert_eq!(payload.get(Field::MainGoal), "Career change");
        assert_eq!(payload.get(Field::Track), "IT Enthusiast");
        assert_eq!(payload.get(Field::Skill), "Cloud Computing");
        assert_eq!(payload.get(Field::ServeInterest), "Yes: I can volunteer");
        assert_eq!(payload.get(Field::Comments), "See you there");
        assert_eq!(payload.get(Field::IncomeGoal), "");
    }

    #[tokio::test]
    async fn employment_other_needs_other_status() {
        let cli = parse(&[
            "register",
            "submit",
            "--employment-status",
            "Student",
            "--employment-other",
            "Pastor",
        ]);
        let Command::Submit(answers) = cli.command else {
            panic!("expected submit");
        };

        let controller = offline_controller();
        fill_form(&controller, answers).await;
        let payload = controller.snapshot().await.payload.clone();
        assert_eq!(payload.get(Field::EmploymentStatus), "Student");
        assert_eq!(payload.get(Field::EmploymentOther), "");
    }

    #[test]
    fn unknown_option_value_is_a_usage_error() {
        let parsed = Cli::try_parse_from(["register", "submit", "--branch", "GPC VANCOUVER"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn proxy_url_defaults_to_local_relay() {
        let cli = parse(&["register", "options"]);
        assert!(matches!(cli.command, Command::Options));
        assert_eq!(cli.proxy_url, "http://127.0.0.1:8787");
    }

    #[test]
    fn finish_reports_each_outcome() {
        assert!(finish(Ok(SubmitOutcome::Submitted)).is_ok());

        let err = finish(Ok(SubmitOutcome::AlreadyPending)).expect_err("pending");
        assert_eq!(err.to_string(), "a submission is already in flight");

        let invalid = SubmitError::Invalid(ValidationError::MissingRequired {
            fields: vec![Field::Phone, Field::Track],
        });
        let err = finish(Err(invalid)).expect_err("invalid");
        assert_eq!(err.to_string(), "missing required fields: Phone Number, Skill Track");

        let rejected = SubmitError::Transport(TransportError::Rejected {
            status: 500,
            message: Some("Google Script error".into()),
        });
        let err = finish(Err(rejected)).expect_err("rejected");
        assert!(err.to_string().contains("status 500"), "{err}");
    }

    #[test]
    fn options_listing_names_every_choice_field() {
        let listing = options_listing();
        assert!(listing.starts_with("Church Branch:\n  GPC TORONTO\n"));
        for label in ["Main Goal", "Skill Track", "Skill Interest"] {
            assert!(listing.contains(label), "{label}");
        }
        assert!(listing.contains("  Not right now\n"));
    }
}
