//! Social Publisher CLI
//!
//! Multi-platform publishing assistant for generated media

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use social_publisher::{
    AdapterLoader, CaptionScanner, ConfigLoadOptions, ConfigLoader, CredentialValidator,
    MediaType, OrchestratorOptions, PlatformTarget, PublishDraft, PublishOrchestrator,
    PublisherConfig, RequestValidator, SecureTokenManager,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Multi-platform publishing assistant for generated media
#[derive(Parser)]
#[command(name = "social-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Multi-platform publishing assistant for generated media", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a media asset to one or more platforms
    Publish {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Read the request from a YAML/JSON draft file
        #[arg(long)]
        request_file: Option<PathBuf>,

        /// Comma-separated target platforms (x, instagram, tiktok, youtube)
        #[arg(short, long)]
        targets: Option<String>,

        /// Caption text
        #[arg(long)]
        caption: Option<String>,

        /// Title (required by YouTube)
        #[arg(long)]
        title: Option<String>,

        /// Comma-separated tags without the leading #
        #[arg(long)]
        tags: Option<String>,

        /// Media type (image|video)
        #[arg(long)]
        media_type: Option<String>,

        /// Remote media URL
        #[arg(long)]
        media_url: Option<String>,

        /// Local media file, sent as an inline payload (requires --mime-type)
        #[arg(long)]
        media_file: Option<PathBuf>,

        /// MIME type of the inline media
        #[arg(long)]
        mime_type: Option<String>,

        /// Call-to-action URL
        #[arg(long)]
        cta: Option<String>,

        /// Campaign identifier
        #[arg(long)]
        campaign: Option<String>,

        /// Dispatch platforms one at a time
        #[arg(long)]
        sequential: bool,

        /// Maximum concurrent platform calls
        #[arg(long)]
        max_concurrency: Option<usize>,

        /// Overall deadline in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Validate only, publish nothing
        #[arg(long)]
        dry_run: bool,

        /// Non-interactive mode (CI/CD)
        #[arg(long)]
        non_interactive: bool,

        /// Skip the caption leak scan
        #[arg(long)]
        skip_scan: bool,
    },

    /// Check configuration and platform readiness
    Check {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Check a single platform
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Initialize social-publisher configuration
    Init {
        /// Project path (defaults to current directory)
        #[arg(value_name = "PROJECT_PATH")]
        project_path: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            project_path,
            request_file,
            targets,
            caption,
            title,
            tags,
            media_type,
            media_url,
            media_file,
            mime_type,
            cta,
            campaign,
            sequential,
            max_concurrency,
            timeout,
            dry_run,
            non_interactive,
            skip_scan,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            let draft = build_draft(
                request_file,
                caption,
                title,
                tags,
                media_type,
                media_url,
                media_file,
                mime_type,
                cta,
                campaign,
            )
            .await?;

            publish_command(
                path,
                draft,
                targets,
                sequential,
                max_concurrency,
                timeout,
                dry_run,
                non_interactive,
                skip_scan,
            )
            .await
        }
        Commands::Check {
            project_path,
            platform,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            check_command(path, platform).await
        }
        Commands::Init {
            project_path,
            force,
        } => {
            let path = project_path.unwrap_or_else(|| PathBuf::from("."));
            init_command(path, force).await
        }
    }
}

/// Assemble the publish draft from a file or from the CLI flags
#[allow(clippy::too_many_arguments)]
async fn build_draft(
    request_file: Option<PathBuf>,
    caption: Option<String>,
    title: Option<String>,
    tags: Option<String>,
    media_type: Option<String>,
    media_url: Option<String>,
    media_file: Option<PathBuf>,
    mime_type: Option<String>,
    cta: Option<String>,
    campaign: Option<String>,
) -> Result<PublishDraft> {
    let mut draft = match request_file {
        Some(path) => read_draft_file(&path).await?,
        None => PublishDraft::default(),
    };

    // CLI flags override the draft file
    if let Some(caption) = caption {
        draft.caption = Some(caption);
    }
    if let Some(title) = title {
        draft.title = Some(title);
    }
    if let Some(tags) = tags {
        draft.tags = tags.split(',').map(|t| t.trim().to_string()).collect();
    }
    if let Some(media_type) = media_type {
        draft.media_type = Some(parse_media_type(&media_type)?);
    }
    if let Some(media_url) = media_url {
        draft.media_url = Some(media_url);
    }
    if let Some(path) = media_file {
        let bytes = tokio::fs::read(&path).await?;
        draft.media_base64 = Some(BASE64.encode(bytes));
    }
    if let Some(mime_type) = mime_type {
        draft.mime_type = Some(mime_type);
    }
    if let Some(cta) = cta {
        draft.cta_url = Some(cta);
    }
    if let Some(campaign) = campaign {
        draft.campaign_id = Some(campaign);
    }

    Ok(draft)
}

async fn read_draft_file(path: &PathBuf) -> Result<PublishDraft> {
    let content = tokio::fs::read_to_string(path).await?;
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false);

    let draft = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(draft)
}

fn parse_media_type(value: &str) -> Result<MediaType> {
    match value.trim().to_lowercase().as_str() {
        "image" => Ok(MediaType::Image),
        "video" => Ok(MediaType::Video),
        other => anyhow::bail!("unknown media type: {} (expected image|video)", other),
    }
}

fn parse_targets(value: &str) -> Result<Vec<PlatformTarget>> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| PlatformTarget::parse(s).map_err(|e| anyhow::anyhow!("{}", e)))
        .collect()
}

#[allow(clippy::too_many_arguments)]
async fn publish_command(
    project_path: PathBuf,
    draft: PublishDraft,
    targets: Option<String>,
    sequential: bool,
    max_concurrency: Option<usize>,
    timeout: Option<u64>,
    dry_run: bool,
    non_interactive: bool,
    skip_scan: bool,
) -> Result<i32> {
    println!("\n📤 social-publisher\n");

    // 1. Configuration
    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path: project_path.clone(),
        env: HashMap::new(),
    })
    .await?;

    let config_report = ConfigLoader::validate(&config);
    if !config_report.valid {
        eprintln!("❌ 設定ファイルに問題があります:");
        eprintln!("{}", ConfigLoader::format_validation_result(&config_report));
        return Ok(1);
    }
    for warning in &config_report.warnings {
        println!("⚠️  [{}] {}", warning.field, warning.message);
    }

    // 2. Targets
    let targets = match targets {
        Some(ref value) => parse_targets(value)?,
        None => config
            .project
            .as_ref()
            .and_then(|p| p.default_targets.clone())
            .unwrap_or_default(),
    };
    if targets.is_empty() {
        eprintln!("❌ 対象プラットフォームが指定されていません（--targets x,youtube など）");
        return Ok(1);
    }

    // 3. Request
    let validator = RequestValidator::new();
    let report = validator.validate_draft(&draft);
    for warning in &report.warnings {
        println!("⚠️  [{}] {}", warning.field, warning.message);
    }
    if !report.valid {
        println!("❌ リクエストの検証に失敗しました:");
        for error in &report.errors {
            println!("  - [{}] {}", error.field, error.message);
        }
        return Ok(1);
    }
    let request = validator.build(draft)?;

    println!(
        "Targets: {}\n",
        targets
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // 4. Caption leak scan
    if config.caption_scanning_enabled() && !skip_scan {
        println!("🔒 Caption scan...");

        let scan = CaptionScanner::new().scan_request(&request);
        if scan.findings.is_empty() {
            println!("  ✅ No secrets detected\n");
        } else {
            println!("⚠️  Potential secrets detected:");
            for finding in &scan.findings {
                println!(
                    "  - [{}] {} ({})",
                    finding.field, finding.secret_type, finding.matched
                );
            }

            if non_interactive {
                eprintln!(
                    "❌ {}件の機密情報らしき文字列を検出したため中止します",
                    scan.findings.len()
                );
                return Ok(1);
            }
            if !confirm("⚠️  Continue with publishing?").await? {
                eprintln!("Publishing cancelled by user");
                return Ok(1);
            }
        }
    }

    let loader = AdapterLoader::new(config.clone());

    // 5. Dry-run: platform rule checks only, nothing is posted
    if dry_run {
        println!("🧪 Dry-run (validation only)...\n");
        let adapters = loader.adapters_for(&targets);
        let mut failed = false;

        for target in &targets {
            match adapters.get(target) {
                None => {
                    println!("  ❌ {}: プラットフォームが無効になっています", target);
                    failed = true;
                }
                Some(adapter) => {
                    let result = adapter.validate(&request);
                    if result.valid {
                        println!("  ✅ {}: OK", target);
                    } else {
                        failed = true;
                        println!("  ❌ {}:", target);
                        for error in &result.errors {
                            println!("    - [{}] {}", error.field, error.message);
                        }
                    }
                }
            }
        }

        println!();
        return Ok(if failed { 1 } else { 0 });
    }

    // 6. Confirmation (interactive mode)
    let should_confirm = !non_interactive
        && config
            .publish
            .as_ref()
            .and_then(|p| p.confirm)
            .unwrap_or(true);

    if should_confirm {
        let media_display = match &request.media {
            m if m.is_inline() => "inline".to_string(),
            m => m.url().unwrap_or("-").to_string(),
        };
        println!("📋 Pre-publish checklist:");
        println!("  ✅ Media: {} ({})", request.media_type, media_display);
        println!("  ✅ Caption: {}文字", request.caption.chars().count());
        println!("  ✅ Validation: passed");
        println!();

        if !confirm("Proceed with publishing?").await? {
            println!("Publishing cancelled by user");
            return Ok(1);
        }
    }

    // 7. Publish
    println!("📤 Publishing...\n");

    let mut options = OrchestratorOptions::from_config(&config);
    if sequential {
        options.sequential = true;
    }
    if let Some(max_concurrency) = max_concurrency {
        options.max_concurrency = max_concurrency;
    }
    if let Some(timeout) = timeout {
        options.timeout = Duration::from_secs(timeout);
    }

    let orchestrator =
        PublishOrchestrator::new(loader.adapters_for(&targets)).with_options(options);
    let report = orchestrator.publish(&request, &targets).await?;

    for result in &report.results {
        if result.is_success() {
            println!(
                "  ✅ {}: post {}{}",
                result.platform,
                result.post_id.as_deref().unwrap_or("-"),
                result
                    .post_url
                    .as_deref()
                    .map(|u| format!(" ({})", u))
                    .unwrap_or_default()
            );
        } else {
            println!(
                "  ❌ {}: {}",
                result.platform,
                result.message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!(
        "\n📊 {} succeeded, {} failed ({}ms, publish {})",
        report.succeeded, report.failed, report.duration_ms, report.publish_id
    );

    if report.all_succeeded() {
        println!("\n✅ Publishing completed successfully!");
        Ok(0)
    } else {
        println!("\n❌ Publishing completed with errors");
        Ok(1)
    }
}

async fn check_command(project_path: PathBuf, platform_filter: Option<String>) -> Result<i32> {
    println!("\n🔍 Platform Check\n");

    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path,
        env: HashMap::new(),
    })
    .await?;

    println!("Configuration:");
    println!(
        "{}",
        ConfigLoader::format_validation_result(&ConfigLoader::validate(&config))
    );
    println!();

    let filter = platform_filter
        .map(|value| PlatformTarget::parse(&value))
        .transpose()?;

    let loader = AdapterLoader::new(config);
    let tokens = SecureTokenManager::new();
    let credential_validator = CredentialValidator::new();
    let mut not_ready = 0;

    println!("Platforms:");
    for detected in loader.detect_platforms() {
        if let Some(filter) = filter {
            if detected.platform != filter {
                continue;
            }
        }

        if !detected.enabled {
            println!("  ⏭️  {}: disabled", detected.platform);
            continue;
        }

        if !detected.token_present {
            not_ready += 1;
            println!(
                "  ❌ {}: トークンが未設定です（{}）",
                detected.platform, detected.token_env
            );
            continue;
        }

        // Token present: flag obvious placeholders before they hit the API
        let Some(token) = tokens.get_token(detected.platform) else {
            continue;
        };
        let check = credential_validator
            .validate_platform_token(detected.platform, token.expose_secret());
        if check.is_likely_real {
            println!("  ✅ {}: ready", detected.platform);
        } else {
            not_ready += 1;
            println!("  ⚠️  {}: {}", detected.platform, check.reason);
        }
    }

    println!();
    Ok(if not_ready > 0 { 1 } else { 0 })
}

async fn init_command(project_path: PathBuf, force: bool) -> Result<i32> {
    println!("\n🎯 Initialize social-publisher\n");

    let path = project_path.join(".social-publisher.yml");
    if tokio::fs::metadata(&path).await.is_ok() && !force {
        eprintln!("⚠️  {} は既に存在します（--forceで上書き）", path.display());
        return Ok(1);
    }

    let header = "\
# social-publisher configuration
#
# Platform tokens come from the environment:
#   X_BEARER_TOKEN, INSTAGRAM_ACCESS_TOKEN, TIKTOK_ACCESS_TOKEN, YOUTUBE_ACCESS_TOKEN
";
    let body = serde_yaml::to_string(&PublisherConfig::default())?;
    tokio::fs::write(&path, format!("{}{}", header, body)).await?;

    println!("✅ Created {}", path.display());
    Ok(0)
}

/// Prompt user for confirmation
async fn confirm(message: &str) -> Result<bool> {
    print!("{} (yes/no): ", message);
    io::stdout().flush().await?;

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut answer = String::new();

    reader.read_line(&mut answer).await?;

    let answer = answer.trim().to_lowercase();
    Ok(answer == "yes" || answer == "y")
}
