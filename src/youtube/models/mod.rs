use serde::Deserialize;

pub mod playlist_items;
pub mod playlists;

/// Envelope shared by YouTube Data API list responses.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub next_page_token: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub page_info: Option<PageInfo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: Option<u32>,
}
