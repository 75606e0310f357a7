//! The CLI can do a few things. This provides a central point where those things are routed and
//! then done, making it easier to test this crate deterministically.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::{info_span, Instrument};

use query_engine_translation::translation::{query, request::QueryRequest};
use sqm_configuration::{Dialect, NegationStrategy};

/// The various contextual bits and bobs we need to run.
pub struct Context {
    /// The directory holding the configuration.
    pub context_path: PathBuf,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize a configuration in the context directory.
    Initialize {
        /// Overwrite an existing configuration.
        #[arg(long)]
        force: bool,
        #[arg(long, value_enum, default_value_t)]
        dialect: Dialect,
        #[arg(long, value_enum, default_value_t)]
        negation_strategy: NegationStrategy,
    },
    /// Analyse a request and print it back as HQL.
    Render {
        /// The JSON file holding the request.
        #[arg(long)]
        request: PathBuf,
    },
    /// Translate a request to SQL and print it with its parameters.
    Translate {
        /// The JSON file holding the request.
        #[arg(long)]
        request: PathBuf,
        /// Format the SQL for reading.
        #[arg(long)]
        pretty: bool,
        /// Print the EXPLAIN form of the query.
        #[arg(long)]
        explain: bool,
    },
    /// Print the JSON schema of the configuration, or of a request.
    Schema {
        #[arg(long)]
        request: bool,
    },
}

/// Run a command in a given context, returning what it has to say.
pub async fn run(command: Command, context: Context) -> anyhow::Result<String> {
    match command {
        Command::Initialize {
            force,
            dialect,
            negation_strategy,
        } => initialize(&context.context_path, force, dialect, negation_strategy).await,
        Command::Render { request } => render(&context.context_path, &request).await,
        Command::Translate {
            request,
            pretty,
            explain,
        } => translate(&context.context_path, &request, pretty, explain).await,
        Command::Schema { request } => schema(request),
    }
}

/// Write an empty configuration, and its schema, into the context directory.
async fn initialize(
    context_path: &Path,
    force: bool,
    dialect: Dialect,
    negation_strategy: NegationStrategy,
) -> anyhow::Result<String> {
    let configuration_file = context_path.join(sqm_configuration::CONFIGURATION_FILENAME);
    if !force && tokio::fs::try_exists(&configuration_file).await? {
        anyhow::bail!(
            "{} already exists; use --force to overwrite it",
            configuration_file.display()
        );
    }

    let configuration = sqm_configuration::ParsedConfiguration {
        dialect,
        negation_strategy,
        ..sqm_configuration::ParsedConfiguration::initial()
    };
    sqm_configuration::write_parsed_configuration(configuration, context_path).await?;
    tracing::info!(path = %context_path.display(), "initialized configuration");

    Ok(format!("Initialized {}\n", configuration_file.display()))
}

async fn render(context_path: &Path, request_path: &Path) -> anyhow::Result<String> {
    let configuration = read_configuration(context_path).await?;
    let request = read_request(request_path).await?;
    let prepared = query::prepare(&configuration, &request)?;
    Ok(format!("{}\n", prepared.statement().render_hql()))
}

async fn translate(
    context_path: &Path,
    request_path: &Path,
    pretty: bool,
    explain: bool,
) -> anyhow::Result<String> {
    let configuration = read_configuration(context_path).await?;
    let request = read_request(request_path).await?;
    let plan = async {
        query::translate(&configuration, request).map_err(|err| {
            tracing::error!("{}", err);
            err
        })
    }
    .instrument(info_span!("Plan query"))
    .await?;

    let sql = if explain {
        plan.explain_query_sql()
    } else {
        plan.query_sql()
    };
    let mut output = if pretty {
        sqlformat::format(
            &sql.sql,
            &sqlformat::QueryParams::None,
            sqlformat::FormatOptions::default(),
        )
    } else {
        sql.sql
    };
    output.push('\n');
    for (index, param) in sql.params.iter().enumerate() {
        writeln!(output, "-- ${} = {:?}", index + 1, param)?;
    }
    Ok(output)
}

fn schema(request: bool) -> anyhow::Result<String> {
    let schema = if request {
        schemars::schema_for!(QueryRequest)
    } else {
        sqm_configuration::generate_latest_schema()
    };
    Ok(serde_json::to_string_pretty(&schema)? + "\n")
}

async fn read_configuration(
    context_path: &Path,
) -> anyhow::Result<sqm_configuration::Configuration> {
    let parsed = sqm_configuration::parse_configuration(context_path)
        .instrument(info_span!("Parse configuration"))
        .await?;
    Ok(sqm_configuration::make_runtime_configuration(parsed)?)
}

async fn read_request(request_path: &Path) -> anyhow::Result<QueryRequest> {
    let contents = tokio::fs::read_to_string(request_path).await?;
    Ok(serde_json::from_str(&contents)?)
}
