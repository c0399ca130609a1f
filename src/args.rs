use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    /// Serve https using --cert/--key. The access_token cookie is
    /// SameSite=None + Secure, so browsers only send it back over https.
    #[arg(short, long)]
    tls: bool,

    /// PEM certificate for --tls.
    #[arg(long, default_value = "cert.pem")]
    cert: PathBuf,

    /// PEM private key for --tls.
    #[arg(long, default_value = "key.pem")]
    key: PathBuf,

    /// Directory holding users.json, quizzes.json and results.json.
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// The address quizhost should listen on. By default
    /// quizhost will listen just on the IPv4 loopback.
    #[arg(short, long)]
    address: Option<String>,

    /// The port quizhost listens on.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

impl Args {
    pub fn addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.address
            .as_deref()
            .unwrap_or("127.0.0.1")
            .parse()
            .map(|addr: IpAddr| (addr, self.port).into())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tls(&self) -> Option<(&Path, &Path)> {
        self.tls.then(|| (self.cert.as_path(), self.key.as_path()))
    }
}
