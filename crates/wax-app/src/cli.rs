use clap::{Args as ClapArgs, Parser, Subcommand};

/// CoconutWax: WAX wallet bridge over a loopback server and an embedded webview.
#[derive(Parser, Debug)]
#[command(name = "coconut-wax", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level override (off, error, warn, info, debug, trace) or a full
    /// filter directive.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Loopback server port override.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the wallet content on the loopback server until Ctrl-C.
    Serve,

    /// Log in and report token balances.
    Authenticate {
        /// Token contracts to report balances for.
        #[arg(long, value_delimiter = ',')]
        contracts: Vec<String>,
    },

    /// Look up one balance without showing the wallet window.
    RefreshBalance {
        #[arg(long)]
        contract: String,
        #[arg(long)]
        account: String,
    },

    /// Transfer a fungible token.
    TransferToken(TransferTokenArgs),

    /// Transfer AtomicAssets NFTs.
    TransferNft {
        #[arg(long)]
        to: String,
        #[arg(long, value_delimiter = ',', required = true)]
        assets: Vec<String>,
        #[arg(long, default_value = "")]
        memo: String,
    },

    /// List AtomicAssets owned by an account.
    Assets(AssetsArgs),

    /// Download an asset image by content hash.
    Image {
        hash: String,
        #[arg(long)]
        out: String,
    },

    /// Decode a `coconutwax://result` callback URL.
    Decode { url: String },

    /// Print the effective configuration as JSON.
    Config,
}

#[derive(ClapArgs, Debug)]
pub struct TransferTokenArgs {
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long, default_value = wax_bridge::DEFAULT_TOKEN_CONTRACT)]
    pub contract: String,
    #[arg(long)]
    pub symbol: String,
    #[arg(long, default_value = "")]
    pub memo: String,
}

#[derive(ClapArgs, Debug)]
pub struct AssetsArgs {
    #[arg(long)]
    pub owner: String,
    #[arg(long, default_value_t = wax_atomic::types::DEFAULT_PAGE)]
    pub page: u32,
    #[arg(long, default_value_t = wax_atomic::types::DEFAULT_LIMIT)]
    pub limit: u32,
    #[arg(long)]
    pub transferable: Option<bool>,
    #[arg(long)]
    pub collection: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
