//! Live debate-room session from the terminal.
//!
//! Usage:
//!   cargo run --example debate -- --project <id> 本章反派的动机是否站得住
//!   cargo run --example debate -- --project <id> --chapter <id> --quote "选中的原文段落" 这段怎么改
//!
//! Ctrl-C abandons the session.

use std::collections::HashMap;
use std::io::{self, Write};

use clap::Parser;
use debate_stream::{
    quote_channel, Category, DebateClient, DebateError, DebateRequest, HttpTransport, Message,
    SessionEvent, TopicDraft,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "debate", about = "Run a debate-room session against the local backend")]
struct Cli {
    /// Project the debate belongs to
    #[arg(long)]
    project: String,

    /// Chapter to anchor the debate to
    #[arg(long)]
    chapter: Option<String>,

    /// Quoted passage, as the drop-to-quote UI would hand over
    #[arg(long)]
    quote: Option<String>,

    /// Backend base URL
    #[arg(long, default_value = "http://127.0.0.1:8765")]
    base_url: String,

    /// Free-form debate topic
    topic: Vec<String>,
}

/// Repaints only what each snapshot added, so tokens appear as they stream.
struct Renderer {
    painted: HashMap<u64, (usize, bool)>,
}

impl Renderer {
    fn new() -> Self {
        Self {
            painted: HashMap::new(),
        }
    }

    fn paint(&mut self, messages: &[Message]) {
        for message in messages {
            let state = self.painted.entry(message.id).or_insert_with(|| {
                match message.category {
                    Category::System => eprint!("\n\x1b[2m[{}]\x1b[0m ", message.display_name),
                    Category::Agent => eprint!("\n\x1b[1;36m{}>\x1b[0m ", message.display_name),
                }
                (0, false)
            });
            if message.text.len() > state.0 {
                print!("{}", &message.text[state.0..]);
                io::stdout().flush().ok();
                state.0 = message.text.len();
            }
            if message.complete && !state.1 {
                state.1 = true;
                println!();
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // The quote hand-off runs through the same channel the selection UI uses.
    let (quote_tx, mut quote_rx) = quote_channel();
    if let Some(quote) = &cli.quote {
        let _ = quote_tx.send(quote.clone());
    }
    let mut draft = TopicDraft::new(cli.topic.join(" "));
    draft.drain_quotes(&mut quote_rx);
    if draft.is_empty() {
        eprintln!("error: nothing to debate. Pass a topic and/or --quote");
        std::process::exit(1);
    }

    let mut request = DebateRequest::new(cli.project, draft.compose());
    if let Some(chapter) = cli.chapter {
        request = request.with_chapter(chapter);
    }

    let transport = HttpTransport::new().with_base_url(cli.base_url);
    let client = DebateClient::new(transport);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let (tx, mut rx) = mpsc::channel::<SessionEvent>(64);

    // Paint events as they arrive
    let painter = tokio::spawn(async move {
        let mut renderer = Renderer::new();
        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::Started => {
                    eprintln!("\x1b[2mconnected, waiting for the room...\x1b[0m");
                }
                SessionEvent::Snapshot { messages } => renderer.paint(&messages),
                SessionEvent::Ended => eprintln!("\x1b[2m[stream closed]\x1b[0m"),
                SessionEvent::Failed { message } => {
                    eprintln!("\n\x1b[1;31msession failed:\x1b[0m {message}");
                }
            }
        }
    });

    match client.run_cancellable(request, tx, cancel).await {
        Ok(transcript) => {
            painter.await.ok();
            eprintln!("\x1b[2m  [{} messages]\x1b[0m", transcript.len());
        }
        Err(DebateError::Cancelled) => {
            painter.await.ok();
            eprintln!("\nabandoned.");
        }
        Err(e) => {
            painter.await.ok();
            eprintln!("\x1b[1;31merror:\x1b[0m {e}");
            std::process::exit(1);
        }
    }
}
