use std::{io, time::Duration};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    annotation::{credits::CreditAnnotator, links, links::LinkAnnotator, Annotator},
    api::cli::{Cli, CliCommand},
    catalog::{
        id_file::IdFileCatalog,
        topic_tree::{Selection, TopicTreeCatalog},
        Catalog, TargetIds,
    },
    config::config::Config,
    reconcile::{ReconcileOptions, Reconciler},
    types::RunCounters,
    youtube::{
        auth::{self, RefreshTokenProvider},
        client::YouTubeClient,
        transport::ReqwestTransport,
        VideoPlatform,
    },
};

mod annotation;
mod api;
mod catalog;
mod config;
mod reconcile;
mod types;
mod youtube;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    let cli = Cli {};
    let program = cli.run();

    init_logging(program.verbose);

    match program.command {
        CliCommand::Links {
            dry_run,
            language,
            remove_stale,
            config,
        } => command_links(config, dry_run, language, remove_stale),
        CliCommand::Credits {
            dry_run,
            remove_stale,
            config,
        } => command_credits(config, dry_run, remove_stale),
        CliCommand::Show {
            video_id,
            editable,
            config,
        } => command_show(config, video_id, editable),
        CliCommand::Authorize { config } => command_authorize(config),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "ka_links=debug"
    } else {
        "ka_links=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

type Client = YouTubeClient<ReqwestTransport, RefreshTokenProvider<ReqwestTransport>>;

fn youtube_client(config: &Config, transport: &ReqwestTransport) -> Result<Client> {
    let tokens = RefreshTokenProvider::new(
        transport.clone(),
        config.get_oauth_client(),
        config.get_refresh_token(),
    );

    Ok(
        YouTubeClient::new(transport.clone(), tokens, config.get_developer_key())?
            .with_retry(config.get_retry_policy()),
    )
}

fn load_extra_ids(config: &Config, targets: &mut TargetIds) -> Result<()> {
    if let Some(path) = config.get_extra_ids_file()? {
        let extra = IdFileCatalog::new(path).targets()?;
        info!("{} extra ids loaded", extra.len());
        targets.extend(extra);
    }

    Ok(())
}

fn command_links(
    config: Option<String>,
    dry_run: bool,
    language: String,
    remove_stale: bool,
) -> Result<()> {
    let config = Config::new_from_file(config)?;
    config.validate()?;

    if !links::is_known_locale(&language) {
        warn!("no preamble for language {}, using English", language);
    }

    let transport = ReqwestTransport::new(HTTP_TIMEOUT)?;

    info!("Fetching Khan Academy video library...");
    let mut targets = TopicTreeCatalog::new(
        transport.clone(),
        config.get_catalog_host(),
        &language,
        Selection::AllVideos,
    )
    .targets()?;
    load_extra_ids(&config, &mut targets)?;
    if targets.is_empty() {
        warn!("no catalog videos for language {}", language);
    }

    let annotator = LinkAnnotator::new(&language, config.get_catalog_host());
    reconcile_uploads(&config, &transport, &annotator, &targets, dry_run, remove_stale)
}

fn command_credits(config: Option<String>, dry_run: bool, remove_stale: bool) -> Result<()> {
    let config = Config::new_from_file(config)?;
    config.validate()?;

    let transport = ReqwestTransport::new(HTTP_TIMEOUT)?;

    info!("Fetching Khan Academy video library...");
    let mut targets = TopicTreeCatalog::new(
        transport.clone(),
        config.get_catalog_host(),
        "en",
        Selection::AuthoredBy(config.get_partner_name().to_string()),
    )
    .targets()?;
    load_extra_ids(&config, &mut targets)?;

    reconcile_uploads(&config, &transport, &CreditAnnotator, &targets, dry_run, remove_stale)
}

fn reconcile_uploads<A: Annotator>(
    config: &Config,
    transport: &ReqwestTransport,
    annotator: &A,
    targets: &TargetIds,
    dry_run: bool,
    remove_stale: bool,
) -> Result<()> {
    let client = youtube_client(config, transport)?;
    let options = ReconcileOptions {
        dry_run,
        stale: config.get_stale_policy(remove_stale),
        request_delay: config.get_request_delay(),
    };

    info!("Fetching YouTube uploaded videos...");
    let mut counters = RunCounters::default();
    let result = Reconciler::new(annotator, targets, options).run(&client, &mut counters);

    // Reported whether or not the pass finished
    info!("{} videos seen", counters.total());
    println!("{}", counters);

    Ok(result?)
}

fn command_show(config: Option<String>, video_id: String, editable: bool) -> Result<()> {
    let config = Config::new_from_file(config)?;
    config.validate()?;

    let transport = ReqwestTransport::new(HTTP_TIMEOUT)?;
    let client = youtube_client(&config, &transport)?;
    let video = client.video(&video_id, editable)?;
    let description = video.description.as_deref();

    println!("id:          {}", video.id);
    println!("title:       {}", video.title.as_deref().unwrap_or(""));
    println!("keywords:    {}", video.keywords.as_deref().unwrap_or(""));
    println!("draft:       {}", video.is_draft);
    println!("editable:    {}", video.edit_url.is_some());
    println!("link:        {}", links::is_annotated(description));
    println!("credit:      {}", CreditAnnotator.is_annotated(description));
    println!("description:\n{}", description.unwrap_or(""));

    Ok(())
}

fn command_authorize(config: Option<String>) -> Result<()> {
    let config = Config::new_from_file(config)?;
    config.validate_client()?;

    let client = config.get_oauth_client();
    println!("{}", auth::authorize_url(&client)?);
    println!("Enter the resulting code: ");

    let mut code = String::new();
    io::stdin()
        .read_line(&mut code)
        .context("Cannot read authorization code")?;

    if code.trim().is_empty() {
        return Err(anyhow!("No authorization code given"));
    }

    let transport = ReqwestTransport::new(HTTP_TIMEOUT)?;
    let grant = auth::exchange_code(&transport, &client, &code)?;

    println!("Access token: {}", grant.access_token);
    match grant.refresh_token {
        Some(refresh_token) => println!(
            "Refresh token: {}\nPut it into refresh_token in \"{}\"",
            refresh_token,
            config.get_config_file().display()
        ),
        None => warn!("no refresh token granted, revoke access and authorize again"),
    }

    Ok(())
}
