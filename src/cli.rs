use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Serve the chat page in the browser instead of the terminal prompt
    #[arg(short, long)]
    pub web: bool,

    /// Address the chat page listens on
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Chat model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Image generation model to use
    #[arg(long)]
    pub image_model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory generated images are saved to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Do not open generated images in the system viewer
    #[arg(long)]
    pub no_preview: bool,
}
