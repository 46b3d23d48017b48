use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of game frames per second", default_value_t = 60.0)]
    pub tick_rate: f64,

    #[arg(short, long, value_name = "FLOAT", help = "Frame rate, i.e. number of renders per second", default_value_t = 60.0)]
    pub frame_rate: f64,

    #[arg(short, long, value_name = "INT", help = "Seed for the obstacle stream")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["flappy-rs"]);
        assert_eq!(cli.tick_rate, 60.0);
        assert_eq!(cli.frame_rate, 60.0);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_seed() {
        let cli = Cli::parse_from(["flappy-rs", "--seed", "42", "-t", "30"]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.tick_rate, 30.0);
    }
}
