use std::ffi::OsString;

use anyhow::{anyhow, Context};
use log::debug;
use tokio::process::Command;

use crate::config::YtDlpOptions;

use super::{VideoMetadata, VideoMetadataSource};

const OUTPUT_TEMPLATE: &str = "%(id)s_%(title)s.%(ext)s";

pub fn video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Reads per-video metadata through the yt-dlp command line tool.
pub struct YtDlp {
    options: YtDlpOptions,
}

impl YtDlp {
    pub fn new(options: YtDlpOptions) -> Self {
        Self { options }
    }

    pub fn args(&self, video_id: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--dump-single-json".into(),
            "--skip-download".into(),
            "--no-playlist".into(),
            "--quiet".into(),
            "--no-warnings".into(),
            "--ignore-config".into(),
            "--cookies".into(),
            self.options.cookies.clone().into(),
            "--download-archive".into(),
            self.options.archive.clone().into(),
        ];
        if self.options.store_json {
            args.push("--write-info-json".into());
            args.push("--no-simulate".into());
            args.push("--output".into());
            args.push(self.options.output.join(OUTPUT_TEMPLATE).into());
        } else {
            // Simulated runs only read the archive unless forced to append.
            args.push("--force-write-archive".into());
        }
        args.push(video_url(video_id).into());
        args
    }
}

#[async_trait::async_trait]
impl VideoMetadataSource for YtDlp {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, anyhow::Error> {
        let output = Command::new(&self.options.binary)
            .args(self.args(video_id))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.options.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        // Videos already recorded in the download archive produce no output.
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Err(anyhow!("yt-dlp returned no metadata for {}", video_id));
        }

        let metadata: VideoMetadata = serde_json::from_slice(&output.stdout)
            .context("could not parse yt-dlp metadata")?;
        debug!(
            "yt-dlp metadata for {} ({:?}): track={:?} artist={:?}",
            video_id, metadata.title, metadata.track, metadata.artist
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn options(store_json: bool) -> YtDlpOptions {
        YtDlpOptions {
            binary: PathBuf::from("yt-dlp"),
            cookies: PathBuf::from("/tmp/cookies.txt"),
            archive: PathBuf::from("/tmp/archive.log"),
            output: PathBuf::from("/tmp/json"),
            store_json,
        }
    }

    #[test]
    fn args_without_info_json() {
        let args = YtDlp::new(options(false)).args("dQw4w9WgXcQ");
        assert_eq!(args.first(), Some(&OsString::from("--dump-single-json")));
        assert_eq!(
            args.last(),
            Some(&OsString::from("https://www.youtube.com/watch?v=dQw4w9WgXcQ"))
        );
        assert!(args.contains(&OsString::from("/tmp/cookies.txt")));
        assert!(args.contains(&OsString::from("/tmp/archive.log")));
        assert!(!args.contains(&OsString::from("--write-info-json")));
    }

    #[test]
    fn simulated_run_still_records_archive() {
        let force = OsString::from("--force-write-archive");

        let args = YtDlp::new(options(false)).args("abc");
        assert!(args.contains(&force));
        assert!(!args.contains(&OsString::from("--no-simulate")));

        let args = YtDlp::new(options(true)).args("abc");
        assert!(args.contains(&OsString::from("--no-simulate")));
        assert!(!args.contains(&force));
    }

    #[test]
    fn args_with_info_json() {
        let args = YtDlp::new(options(true)).args("abc");
        assert!(args.contains(&OsString::from("--write-info-json")));
        assert!(args.contains(&OsString::from("/tmp/json/%(id)s_%(title)s.%(ext)s")));
    }

    #[tokio::test]
    async fn missing_binary_is_an_error() {
        let mut options = options(false);
        options.binary = PathBuf::from("/nonexistent/yt-dlp-binary");
        let result = YtDlp::new(options).video_metadata("abc").await;
        assert!(result.is_err());
    }
}
