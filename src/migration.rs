use futures::StreamExt;
use log::{error, info};

use crate::{
    normalize::normalize,
    spotify::{
        matcher::{find_uri, MatchPolicy},
        Destination,
    },
    track::{ExtractionResult, RawPlaylistItem, Track},
    youtube::{
        extractor::{try_heuristic, try_structured, VideoMetadataSource},
        list_items, PlaylistSource,
    },
};

/// Counters for one playlist migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationRun {
    pub seen: usize,
    pub matched: usize,
    pub added: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub run: MigrationRun,
    pub playlist_id: Option<String>,
    pub playlist_track_count: Option<u32>,
    /// Items logged as not found, in playlist order.
    pub not_found: Vec<String>,
}

impl MigrationReport {
    pub fn summary(&self, dry_run: bool) -> String {
        if dry_run {
            return format!(
                "Dry run: matched {} songs out of {}",
                self.run.matched, self.run.seen
            );
        }
        let added = self
            .playlist_track_count
            .map(|count| count as usize)
            .unwrap_or(self.run.added);
        format!("Added {} songs out of {}", added, self.run.seen)
    }
}

/// Moves one YouTube playlist into a new destination playlist, one item at a
/// time.
pub struct Migration<'a> {
    pub source: &'a dyn PlaylistSource,
    pub metadata: &'a dyn VideoMetadataSource,
    pub destination: &'a dyn Destination,
    pub policy: MatchPolicy,
    pub dry_run: bool,
}

impl<'a> Migration<'a> {
    pub async fn extract(&self, item: &RawPlaylistItem) -> ExtractionResult {
        if let Some(track) = try_structured(self.metadata, &item.external_video_id).await {
            return track.into();
        }
        try_heuristic(&item.display_title)
            .map(ExtractionResult::from)
            .unwrap_or_default()
    }

    async fn read_source(&self, playlist_id: &str) -> Vec<RawPlaylistItem> {
        let mut items = Vec::new();
        let mut stream = list_items(self.source, playlist_id);
        while let Some(item) = stream.next().await {
            match item {
                Ok(item) => items.push(item),
                Err(err) => {
                    error!(
                        "Reading playlist {} stopped after {} items: {:#}",
                        playlist_id,
                        items.len(),
                        err
                    );
                    break;
                }
            }
        }
        items
    }

    async fn create_playlist(&self, name: &str, playlist_id: &str) -> Option<String> {
        if self.dry_run {
            info!("Dryrun");
            return None;
        }
        let description = format!("Migrated from YouTube playlist {}", playlist_id);
        match self.destination.create_playlist(name, &description).await {
            Ok(id) => {
                info!("Created playlist {} ({})", name, id);
                Some(id)
            }
            Err(err) => {
                error!("Could not create playlist {}: {:#}", name, err);
                None
            }
        }
    }

    async fn resolve(&self, item: &RawPlaylistItem) -> Option<Track> {
        let Some(track) = self.extract(item).await.into_track() else {
            error!("{} was not found!", item.display_title);
            return None;
        };
        let track = normalize(&track);
        if !track.is_complete() {
            error!("{} was not found!", item.display_title);
            return None;
        }
        Some(track)
    }

    pub async fn run(&self, playlist_id: &str, playlist_name: &str) -> MigrationReport {
        let items = self.read_source(playlist_id).await;
        let mut report = MigrationReport {
            playlist_id: self.create_playlist(playlist_name, playlist_id).await,
            ..Default::default()
        };

        for item in items.iter() {
            report.run.seen += 1;
            info!(
                "Youtube API - Title {} Video ID {}",
                item.display_title, item.external_video_id
            );

            let Some(track) = self.resolve(item).await else {
                report.not_found.push(item.display_title.clone());
                continue;
            };

            let Some(uri) = find_uri(self.destination, &track, self.policy).await else {
                let missing = format!("{} - {}", track.artist, track.title);
                error!("{} was not found!", missing);
                report.not_found.push(missing);
                continue;
            };
            report.run.matched += 1;

            let Some(destination_playlist) = report.playlist_id.as_deref() else {
                continue;
            };
            if self.destination.add_track(&uri, destination_playlist).await {
                report.run.added += 1;
                info!("{} - {} was added to playlist.", track.artist, track.title);
            } else {
                error!("{} - {} could not be added.", track.artist, track.title);
            }
        }

        if let Some(destination_playlist) = report.playlist_id.as_deref() {
            report.playlist_track_count = self.destination.count_tracks(destination_playlist).await;
        }
        info!("{}", report.summary(self.dry_run));
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use anyhow::anyhow;
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        spotify::MockDestination,
        track::MatchCandidate,
        youtube::{extractor::VideoMetadata, PlaylistPage},
    };

    struct Source(Vec<RawPlaylistItem>);

    #[async_trait::async_trait]
    impl PlaylistSource for Source {
        async fn fetch_page(
            &self,
            _playlist_id: &str,
            _page_token: Option<&str>,
        ) -> Result<PlaylistPage, anyhow::Error> {
            Ok(PlaylistPage {
                items: self.0.clone(),
                next_page_token: None,
            })
        }

        async fn playlist_title(&self, _playlist_id: &str) -> Result<String, anyhow::Error> {
            Ok("Source".to_string())
        }
    }

    /// yt-dlp stand-in keyed by video id; unknown ids fail the lookup.
    struct Metadata(HashMap<&'static str, VideoMetadata>);

    #[async_trait::async_trait]
    impl VideoMetadataSource for Metadata {
        async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, anyhow::Error> {
            self.0
                .get(video_id)
                .cloned()
                .ok_or_else(|| anyhow!("ERROR: [youtube] {}: Video unavailable", video_id))
        }
    }

    fn item(title: &str, id: &str) -> RawPlaylistItem {
        RawPlaylistItem {
            display_title: title.to_string(),
            external_video_id: id.to_string(),
        }
    }

    fn metadata(artist: &str, track: &str) -> VideoMetadata {
        VideoMetadata {
            artist: Some(artist.to_string()),
            track: Some(track.to_string()),
            ..Default::default()
        }
    }

    fn flor_source() -> (Source, Metadata) {
        let source = Source(vec![
            item("Flor - Hold On (Official Video)", "a"),
            item("vlog #12 outtakes", "b"),
        ]);
        let metadata = Metadata(HashMap::from([("a", metadata("Flor", "Hold On"))]));
        (source, metadata)
    }

    #[tokio::test]
    async fn migrates_matched_items_and_skips_the_rest() {
        let (source, metadata) = flor_source();
        let mut destination = MockDestination::new();
        destination
            .expect_create_playlist()
            .with(eq("Flor mix"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok("pl1".to_string()));
        destination
            .expect_search_tracks()
            .with(eq("Hold On Flor"), eq(10))
            .times(1)
            .returning(|_, _| {
                Ok(vec![MatchCandidate {
                    uri: "spotify:track:holdon".to_string(),
                    artist_name: "FLOR".to_string(),
                }])
            });
        destination
            .expect_add_track()
            .with(eq("spotify:track:holdon"), eq("pl1"))
            .times(1)
            .returning(|_, _| true);
        destination
            .expect_count_tracks()
            .with(eq("pl1"))
            .times(1)
            .returning(|_| Some(1));

        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: false,
        };
        let report = migration.run("PL123", "Flor mix").await;

        assert_eq!(
            report.run,
            MigrationRun {
                seen: 2,
                matched: 1,
                added: 1
            }
        );
        assert_eq!(report.playlist_id.as_deref(), Some("pl1"));
        assert_eq!(report.not_found, vec!["vlog #12 outtakes".to_string()]);
        assert_eq!(report.summary(false), "Added 1 songs out of 2");
    }

    #[tokio::test]
    async fn dry_run_never_writes() {
        let (source, metadata) = flor_source();
        let mut destination = MockDestination::new();
        destination.expect_create_playlist().never();
        destination.expect_add_track().never();
        destination.expect_count_tracks().never();
        destination.expect_search_tracks().times(1).returning(|_, _| {
            Ok(vec![MatchCandidate {
                uri: "spotify:track:holdon".to_string(),
                artist_name: "Flor".to_string(),
            }])
        });

        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: true,
        };
        let report = migration.run("PL123", "Flor mix").await;

        assert_eq!(report.playlist_id, None);
        assert_eq!(report.run.matched, 1);
        assert_eq!(report.run.added, 0);
        assert_eq!(report.summary(true), "Dry run: matched 1 songs out of 2");
    }

    #[tokio::test]
    async fn falls_back_to_title_parsing() {
        let source = Source(vec![item("Mr. Probz x Robin Schulz - Waves (Official Video)", "w")]);
        let metadata = Metadata(HashMap::new());
        let mut destination = MockDestination::new();
        destination.expect_create_playlist().returning(|_, _| Ok("pl1".to_string()));
        destination
            .expect_search_tracks()
            .with(eq("Waves Mr. Probz"), eq(10))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        destination.expect_add_track().never();
        destination.expect_count_tracks().returning(|_| Some(0));

        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: false,
        };
        let report = migration.run("PL123", "Waves").await;

        assert_eq!(report.run.seen, 1);
        assert_eq!(report.run.matched, 0);
        assert_eq!(report.not_found, vec!["Mr. Probz - Waves".to_string()]);
        assert_eq!(report.summary(false), "Added 0 songs out of 1");
    }

    #[tokio::test]
    async fn write_failures_do_not_stop_the_run() {
        let source = Source(vec![item("first", "a"), item("second", "b")]);
        let metadata = Metadata(HashMap::from([
            ("a", metadata("Flor", "Hold On")),
            ("b", metadata("Flor", "Unsaid")),
        ]));
        let mut destination = MockDestination::new();
        destination.expect_create_playlist().returning(|_, _| Ok("pl1".to_string()));
        destination.expect_search_tracks().times(2).returning(|query, _| {
            Ok(vec![MatchCandidate {
                uri: format!("spotify:track:{}", query.len()),
                artist_name: "Flor".to_string(),
            }])
        });
        let mut calls = 0;
        destination.expect_add_track().times(2).returning(move |_, _| {
            calls += 1;
            calls == 2
        });
        destination.expect_count_tracks().returning(|_| None);

        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: false,
        };
        let report = migration.run("PL123", "Flor").await;

        assert_eq!(report.run.matched, 2);
        assert_eq!(report.run.added, 1);
        assert_eq!(report.summary(false), "Added 1 songs out of 2");
    }

    #[tokio::test]
    async fn failed_playlist_creation_disables_writes() {
        let (source, metadata) = flor_source();
        let mut destination = MockDestination::new();
        destination
            .expect_create_playlist()
            .returning(|_, _| Err(anyhow!("403 Forbidden")));
        destination.expect_search_tracks().returning(|_, _| {
            Ok(vec![MatchCandidate {
                uri: "spotify:track:holdon".to_string(),
                artist_name: "Flor".to_string(),
            }])
        });
        destination.expect_add_track().never();
        destination.expect_count_tracks().never();

        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: false,
        };
        let report = migration.run("PL123", "Flor").await;

        assert_eq!(report.playlist_id, None);
        assert_eq!(report.run.matched, 1);
        assert_eq!(report.summary(false), "Added 0 songs out of 2");
    }

    #[tokio::test]
    async fn extraction_prefers_structured_metadata() {
        let source = Source(Vec::new());
        let metadata = Metadata(HashMap::from([("a", metadata("Flor", "Hold On"))]));
        let destination = MockDestination::new();
        let migration = Migration {
            source: &source,
            metadata: &metadata,
            destination: &destination,
            policy: MatchPolicy::TopResult,
            dry_run: true,
        };

        let result = migration.extract(&item("Some Uploader - Random Title", "a")).await;
        assert_eq!(result.into_track(), Some(Track::new("Flor", "Hold On")));

        let result = migration.extract(&item("Some Uploader - Random Title", "x")).await;
        assert_eq!(
            result.into_track(),
            Some(Track::new("Some Uploader", "Random Title"))
        );

        let result = migration.extract(&item("untitled", "x")).await;
        assert_eq!(result, ExtractionResult::default());
    }
}
