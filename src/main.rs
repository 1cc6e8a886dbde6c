//! edge-voice - 命令行入口
//!
//! 用法:
//! - `edge-voice list [--all]`   列出音色（默认按配置的语言/性别筛选）
//! - `edge-voice current`        显示当前音色
//! - `edge-voice speak <text>`   用当前音色合成并播放，Ctrl-C 取消

use std::sync::Arc;

use edge_voice::application::AudioPlayerPort;
use edge_voice::config::{load_config, print_config, AppConfig};
use edge_voice::infrastructure::{HttpCatalogClient, HttpTtsClient, NullAudioPlayer, RodioAudioPlayer};
use edge_voice::{ProviderError, VoiceCriteria, VoiceProvider};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    print_config(&config);

    let provider = build_provider(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("list") => {
            let criteria = if args.iter().any(|a| a == "--all") {
                VoiceCriteria::default()
            } else {
                config.voice.criteria()
            };
            list_voices(&provider, &criteria).await?;
        }
        Some("current") => {
            let current = provider.current_voice();
            match provider.get_available_voices(false).await {
                Ok(_) => match provider.find_voice(&current) {
                    Some(voice) => println!("{}", voice),
                    None => println!("{} (not in catalog)", current),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Catalog unavailable");
                    println!("{}", current);
                }
            }
        }
        Some("speak") => {
            let text = args[1..].join(" ");
            speak(&provider, &text).await?;
        }
        _ => {
            eprintln!("usage: edge-voice <list [--all] | current | speak <text>>");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// 初始化日志；RUST_LOG 优先于配置文件中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!("warn,edge_voice={}", config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_provider(config: &AppConfig) -> anyhow::Result<VoiceProvider> {
    let catalog = Arc::new(HttpCatalogClient::new(config.catalog_client_config())?);
    let tts_engine = Arc::new(HttpTtsClient::new(config.tts_client_config())?);
    let player: Arc<dyn AudioPlayerPort> = if config.playback.enabled {
        Arc::new(RodioAudioPlayer::new(config.player_config()))
    } else {
        Arc::new(NullAudioPlayer)
    };

    Ok(VoiceProvider::new(
        catalog,
        tts_engine,
        player,
        config.provider_config(),
    ))
}

async fn list_voices(provider: &VoiceProvider, criteria: &VoiceCriteria) -> anyhow::Result<()> {
    let voices = provider.get_filtered_voices(criteria).await?;
    let current = provider.current_voice();

    for (i, voice) in voices.iter().enumerate() {
        let marker = if voice.id() == current { " <- current" } else { "" };
        println!("{:2}. {}{}", i + 1, voice, marker);
    }
    tracing::info!(count = voices.len(), "Voices listed");
    Ok(())
}

async fn speak(provider: &VoiceProvider, text: &str) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received interrupt, cancelling");
            ctrl_c.cancel();
        }
    });

    match provider.synthesize_and_play(text, None, &cancel).await {
        Ok(audio) => {
            tracing::info!(audio_size = audio.len(), format = %audio.format, "Done");
            Ok(())
        }
        Err(ProviderError::Cancelled) => {
            eprintln!("cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
