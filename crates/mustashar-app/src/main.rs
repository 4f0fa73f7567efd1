//! Mustashar application binary - composition root.
//!
//! Ties together all Mustashar crates into a single console executable:
//! 1. Load configuration from TOML
//! 2. Build the HTTP gateways for the remote analysis and speech functions
//! 3. Run the interactive consultation loop on stdin/stdout
//!
//! The console is a thin shell: classification, truncation detection,
//! single-flight submission, and the audio lifecycle all live in the
//! library crates and are exercised here exactly as a GUI front end would.

mod cli;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mustashar_chat::session::ConversationSession;
use mustashar_chat::types::Message;
use mustashar_core::config::MustasharConfig;
use mustashar_gateway::{http_client, HttpAnalysisGateway, HttpSpeechGateway};
use mustashar_speech::error::SpeechError;
use mustashar_speech::gateway::{SpeechAudio, SpeechGateway};
use mustashar_speech::playback::{
    AudioSink, PlaybackController, PlaybackHandle, SpeakOutcome,
};

use cli::CliArgs;

/// Audio sink that writes synthesized audio to the data directory.
///
/// The console has no sound device abstraction; each synthesis lands as a
/// file the user can open with a player. Writing completes synchronously,
/// so the caller reports end-of-playback immediately after a start.
struct FileAudioSink {
    dir: PathBuf,
}

struct FilePlaybackHandle;

impl PlaybackHandle for FilePlaybackHandle {
    fn pause(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

impl AudioSink for FileAudioSink {
    fn start(&self, audio: &SpeechAudio) -> Result<Box<dyn PlaybackHandle>, SpeechError> {
        let ext = match audio.content_type.as_str() {
            "audio/wav" => "wav",
            "audio/ogg" => "ogg",
            _ => "mp3",
        };
        let path = self.dir.join(format!("speech-{}.{}", uuid::Uuid::new_v4(), ext));
        std::fs::write(&path, &audio.data).map_err(|e| SpeechError::Playback(e.to_string()))?;
        println!("تم حفظ الملف الصوتي: {}", path.display());
        Ok(Box::new(FilePlaybackHandle))
    }
}

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

fn print_answer(message: &Message) {
    println!();
    println!("{}", message.content);
    if message.incomplete {
        println!();
        println!("(الإجابة غير مكتملة — اكتب :continue للمتابعة)");
    }
    println!();
}

async fn speak_last(
    session: &ConversationSession,
    playback: &mut PlaybackController,
    gateway: &dyn SpeechGateway,
    sink: &FileAudioSink,
) {
    let Some(message) = session
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == mustashar_chat::types::Role::Assistant)
    else {
        println!("لا توجد إجابة للقراءة بعد.");
        return;
    };

    match playback.speak(&message.content, gateway, sink).await {
        Ok(SpeakOutcome::Started) | Ok(SpeakOutcome::ReplayedFromCache) => {
            // File writes finish synchronously.
            playback.on_playback_ended();
        }
        Ok(SpeakOutcome::Stopped) => println!("تم إيقاف الصوت."),
        Err(e) => println!("تعذر تحويل النص إلى صوت: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MustasharConfig::load_or_default(&config_file);
    if let Some(base) = args.api_base.clone() {
        config.gateway.base_url = base;
    }
    if args.no_speech {
        config.speech.enabled = false;
    }

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Mustashar v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Gateways.
    let api_key = config.resolve_api_key();
    if api_key.is_empty() {
        tracing::warn!(
            "No API key configured; set MUSTASHAR_API_KEY or [gateway].api_key"
        );
    }
    let client = http_client(&config.gateway)?;
    let analysis_gateway =
        HttpAnalysisGateway::new(client.clone(), &config.gateway, api_key.clone());
    let speech_gateway = HttpSpeechGateway::new(client, &config.gateway, api_key);

    // Data directory for synthesized audio.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let sink = FileAudioSink {
        dir: data_dir.clone(),
    };

    // Session state.
    let mut session = ConversationSession::new(&config.chat);
    let mut playback = PlaybackController::new();
    tracing::info!(session = %session.id(), "Conversation session ready");

    println!("مستشار — المستشار القانوني الذكي");
    println!("اكتب سؤالك القانوني، أو أحد الأوامر: :continue :speak :new :quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all("> ".as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            ":quit" | ":q" => break,
            ":new" => {
                session.reset();
                playback.stop();
                println!("بدأت استشارة جديدة.");
            }
            ":continue" => match session.continue_last(&analysis_gateway).await {
                Ok(message) => print_answer(&message),
                Err(e) => println!("تعذرت المتابعة: {}", e),
            },
            ":speak" => {
                if config.speech.enabled {
                    speak_last(&session, &mut playback, &speech_gateway, &sink).await;
                } else {
                    println!("خاصية القراءة الصوتية معطلة.");
                }
            }
            query => match session.submit(query, false, &analysis_gateway).await {
                Ok(message) => {
                    println!("[التصنيف: {}]", session.last_category());
                    print_answer(&message);
                }
                Err(e) => println!("حدث خطأ في التحليل: {}", e),
            },
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
