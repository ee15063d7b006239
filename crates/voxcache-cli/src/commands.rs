//! Subcommands.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the cache key for a text
    Key {
        /// Text to derive the key for
        text: String,
    },

    /// Synthesize a text through the cache and write it as a WAV file
    Speak {
        /// Text to speak
        text: String,

        /// Output WAV file
        #[arg(short, long, default_value = "speech.wav")]
        output: PathBuf,

        /// Chunk size in bytes (defaults to VOXCACHE_CHUNK_SIZE)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Synthesize this many times; repeats after the first are cache hits
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },

    /// Report whether a text is cached for the selected voice
    Check {
        /// Text to look up
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn test_speak_defaults() {
        let cli = Cli::parse_from(["voxcache", "speak", "hi there"]);
        assert_eq!(
            cli.command,
            Some(Commands::Speak {
                text: "hi there".into(),
                output: PathBuf::from("speech.wav"),
                chunk_size: None,
                repeat: 1,
            })
        );
    }

    #[test]
    fn test_speak_options() {
        let cli = Cli::parse_from([
            "voxcache",
            "speak",
            "hi",
            "-o",
            "/tmp/out.wav",
            "--chunk-size",
            "512",
            "--repeat",
            "3",
        ]);
        let Some(Commands::Speak {
            output,
            chunk_size,
            repeat,
            ..
        }) = cli.command
        else {
            panic!("expected speak");
        };
        assert_eq!(output, PathBuf::from("/tmp/out.wav"));
        assert_eq!(chunk_size, Some(512));
        assert_eq!(repeat, 3);
    }
}
