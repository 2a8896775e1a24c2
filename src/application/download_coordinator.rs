use std::path::{Path, PathBuf};

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::{
    api::{ApiClient, MediaDownload},
    domain::{AppError, CheckedMedia, RequestParams, Thumbnail},
    utils::{decode_thumbnail, format_duration},
};

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// The service accepted the request; a save location is needed.
    Started { filename: String },
    Saving(PathBuf),
    /// Fraction of the body written, when the size is known.
    Progress(Option<f32>),
    Completed(PathBuf),
    Cancelled,
    Failed(AppError),
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Fetch metadata for an already validated URL, plus its preview image.
    pub async fn check(&self, url: String) -> Result<CheckedMedia, AppError> {
        let info = self
            .api_client
            .check(&url)
            .await
            .map_err(|e| AppError::Check(e.to_string()))?;

        let thumbnail = match info.thumbnail_url() {
            Some(thumbnail_url) => self.load_thumbnail(thumbnail_url).await,
            None => None,
        };

        Ok(CheckedMedia {
            title: info.display_title(),
            duration: format_duration(info.duration.unwrap_or(0.0)),
            quality: info.display_quality(),
            thumbnail,
        })
    }

    async fn load_thumbnail(&self, url: &str) -> Option<Thumbnail> {
        let data = match self.api_client.fetch_thumbnail(url).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Thumbnail fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let decoded = tokio::task::spawn_blocking(move || decode_thumbnail(&data))
            .await
            .ok()
            .flatten();
        if decoded.is_none() {
            tracing::warn!("Thumbnail at {} is not a decodable image", url);
        }
        decoded
    }

    /// Request the file, ask where to save it, then stream it to disk.
    pub fn download_stream(&self, params: RequestParams) -> BoxStream<'static, DownloadEvent> {
        events(DownloadRuntimeState::Start {
            client: self.api_client.clone(),
            params,
        })
    }
}

pub async fn choose_save_path(suggested_filename: String) -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_file_name(&suggested_filename)
        .save_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

fn events(initial: DownloadRuntimeState) -> BoxStream<'static, DownloadEvent> {
    futures::stream::unfold(initial, |state| async move {
        match state {
            DownloadRuntimeState::Start { client, params } => {
                match client.download(&params).await {
                    Ok(download) => Some((
                        DownloadEvent::Started {
                            filename: download.filename.clone(),
                        },
                        DownloadRuntimeState::ChoosingPath { download },
                    )),
                    Err(e) => Some((
                        DownloadEvent::Failed(AppError::Download(e.to_string())),
                        DownloadRuntimeState::Finished,
                    )),
                }
            }
            DownloadRuntimeState::ChoosingPath { download } => {
                match choose_save_path(download.filename.clone()).await {
                    Some(path) => Some((
                        DownloadEvent::Saving(path.clone()),
                        DownloadRuntimeState::Opening { download, path },
                    )),
                    None => Some((DownloadEvent::Cancelled, DownloadRuntimeState::Finished)),
                }
            }
            DownloadRuntimeState::Opening { download, path } => {
                let file = match tokio::fs::File::create(&path).await {
                    Ok(file) => file,
                    Err(e) => {
                        return Some((
                            DownloadEvent::Failed(AppError::Io(format!(
                                "Failed to create file: {}",
                                e
                            ))),
                            DownloadRuntimeState::Finished,
                        ));
                    }
                };

                let total = download.total_size;
                Some((
                    DownloadEvent::Progress(total.map(|_| 0.0)),
                    DownloadRuntimeState::Writing {
                        file,
                        stream: download.stream,
                        downloaded: 0,
                        total,
                        path,
                    },
                ))
            }
            DownloadRuntimeState::Writing {
                mut file,
                mut stream,
                mut downloaded,
                total,
                path,
            } => match stream.next().await {
                Some(Ok(chunk)) => {
                    let written = file.write_all(&chunk).await;
                    if let Err(e) = written {
                        discard_partial(file, &path).await;
                        return Some((
                            DownloadEvent::Failed(AppError::Io(format!("Write error: {}", e))),
                            DownloadRuntimeState::Finished,
                        ));
                    }

                    downloaded += chunk.len() as u64;

                    let progress = total.map(|total_size| {
                        if total_size > 0 {
                            (downloaded as f32 / total_size as f32).min(1.0)
                        } else {
                            0.0
                        }
                    });

                    Some((
                        DownloadEvent::Progress(progress),
                        DownloadRuntimeState::Writing {
                            file,
                            stream,
                            downloaded,
                            total,
                            path,
                        },
                    ))
                }
                Some(Err(e)) => {
                    discard_partial(file, &path).await;
                    Some((
                        DownloadEvent::Failed(AppError::Download(e.to_string())),
                        DownloadRuntimeState::Finished,
                    ))
                }
                None => {
                    let synced = file.sync_all().await;
                    if let Err(e) = synced {
                        discard_partial(file, &path).await;
                        return Some((
                            DownloadEvent::Failed(AppError::Io(format!(
                                "Failed to sync file: {}",
                                e
                            ))),
                            DownloadRuntimeState::Finished,
                        ));
                    }

                    tracing::info!("Wrote {} bytes to {}", downloaded, path.display());
                    Some((DownloadEvent::Completed(path), DownloadRuntimeState::Finished))
                }
            },
            DownloadRuntimeState::Finished => None,
        }
    })
    .boxed()
}

/// Close and delete a file whose download failed part way.
async fn discard_partial(file: tokio::fs::File, path: &Path) {
    drop(file);
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to remove partial file {}: {}", path.display(), e);
    }
}

enum DownloadRuntimeState {
    Start {
        client: ApiClient,
        params: RequestParams,
    },
    ChoosingPath {
        download: MediaDownload,
    },
    Opening {
        download: MediaDownload,
        path: PathBuf,
    },
    Writing {
        file: tokio::fs::File,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
        downloaded: u64,
        total: Option<u64>,
        path: PathBuf,
    },
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiError;
    use crate::api::ApiConfig;
    use crate::domain::OutputFormat;
    use bytes::Bytes;

    fn coordinator_for(server: &mockito::ServerGuard) -> DownloadCoordinator {
        let config = ApiConfig {
            base_url: url::Url::parse(&format!("{}/", server.url())).unwrap(),
            ..ApiConfig::default()
        };
        DownloadCoordinator::new(ApiClient::new(config))
    }

    fn in_memory(chunks: Vec<&'static [u8]>, total_size: Option<u64>) -> MediaDownload {
        let stream = futures::stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok::<_, ApiError>(Bytes::from_static(chunk))),
        );
        MediaDownload {
            filename: "media.mp4".to_string(),
            total_size,
            stream: stream.boxed(),
        }
    }

    fn save_stream(download: MediaDownload, path: PathBuf) -> BoxStream<'static, DownloadEvent> {
        events(DownloadRuntimeState::Opening { download, path })
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(64, 64, image::Rgba([0, 0, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_save_stream_writes_file_and_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");

        let events: Vec<DownloadEvent> =
            save_stream(in_memory(vec![&b"abcd"[..], &b"efgh"[..]], Some(8)), path.clone())
                .collect()
                .await;

        let progress: Vec<Option<f32>> = events
            .iter()
            .filter_map(|event| match event {
                DownloadEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![Some(0.0), Some(0.5), Some(1.0)]);
        assert!(matches!(events.last(), Some(DownloadEvent::Completed(p)) if *p == path));
        assert_eq!(std::fs::read(&path).unwrap(), b"abcdefgh");
    }

    #[tokio::test]
    async fn test_save_stream_without_length_has_no_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");

        let events: Vec<DownloadEvent> =
            save_stream(in_memory(vec![&b"ID3"[..]], None), path.clone())
                .collect()
                .await;

        assert!(events
            .iter()
            .all(|event| !matches!(event, DownloadEvent::Progress(Some(_)))));
        assert!(matches!(events.last(), Some(DownloadEvent::Completed(_))));
    }

    #[tokio::test]
    async fn test_save_stream_removes_partial_file_on_stream_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");

        let chunks = vec![
            Ok(Bytes::from_static(b"half")),
            Err(ApiError::InvalidResponse("connection reset".to_string())),
        ];
        let download = MediaDownload {
            filename: "clip.mp4".to_string(),
            total_size: Some(8),
            stream: futures::stream::iter(chunks).boxed(),
        };

        let events: Vec<DownloadEvent> = save_stream(download, path.clone()).collect().await;

        assert!(matches!(
            events.last(),
            Some(DownloadEvent::Failed(AppError::Download(_)))
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_stream_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("clip.mp4");

        let events: Vec<DownloadEvent> =
            save_stream(in_memory(vec![&b"x"[..]], Some(1)), path)
                .collect()
                .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], DownloadEvent::Failed(AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_download_stream_stops_on_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(400)
            .create_async()
            .await;

        let params = RequestParams {
            url: "https://www.instagram.com/p/abc/".to_string(),
            format: OutputFormat::Video,
        };
        let events: Vec<DownloadEvent> = coordinator_for(&server)
            .download_stream(params)
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            DownloadEvent::Failed(err) => {
                assert_eq!(err.to_string(), "Failed to download: Download failed: Bad Request")
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_decodes_thumbnail() {
        let mut server = mockito::Server::new_async().await;
        let thumb_url = format!("{}/thumb.png", server.url());
        server
            .mock("POST", "/check")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"title":"Reel","duration":75.4,"quality":"HD","thumbnail":"{}"}}"#,
                thumb_url
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/thumb.png")
            .with_status(200)
            .with_body(png_bytes())
            .create_async()
            .await;

        let media = coordinator_for(&server)
            .check("https://www.instagram.com/reel/abc/".to_string())
            .await
            .unwrap();

        assert_eq!(media.title, "Reel");
        assert_eq!(media.duration, "1:15");
        assert_eq!(media.quality, "HD");
        let thumb = media.thumbnail.unwrap();
        assert_eq!((thumb.width, thumb.height), (64, 64));
    }

    #[tokio::test]
    async fn test_check_survives_broken_thumbnail() {
        let mut server = mockito::Server::new_async().await;
        let thumb_url = format!("{}/video.mp4", server.url());
        server
            .mock("POST", "/check")
            .with_status(200)
            .with_body(format!(r#"{{"title":"Post","thumbnail":"{}"}}"#, thumb_url))
            .create_async()
            .await;
        server
            .mock("GET", "/video.mp4")
            .with_status(200)
            .with_body(b"not an image".to_vec())
            .create_async()
            .await;

        let media = coordinator_for(&server)
            .check("https://www.instagram.com/p/abc/".to_string())
            .await
            .unwrap();

        assert_eq!(media.duration, "0:00");
        assert_eq!(media.quality, "Unknown Quality");
        assert!(media.thumbnail.is_none());
    }

    #[tokio::test]
    async fn test_check_maps_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/check")
            .with_status(404)
            .with_body(r#"{"error":"Story not found"}"#)
            .create_async()
            .await;

        let err = coordinator_for(&server)
            .check("https://www.instagram.com/stories/a/1/".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Check("Story not found".to_string()));
    }
}
