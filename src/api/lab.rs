// src/api/lab.rs

use super::{ApiClient, ApiError, ApiResult};
use crate::models::{LabFile, LabFileListing, LabFileUrl, LabInfo};
use std::io::Write;

/// The lab endpoints used to scaffold a lab directory.
pub trait LabApi {
    fn get_lab_info(&self, token: &str) -> ApiResult<LabInfo>;
    /// Lists every file of the lab, or only its public files.
    fn list_lab_files(&self, token: &str, public_only: bool) -> ApiResult<Vec<LabFile>>;
    /// Fetches a fresh pre-signed URL for a single file.
    fn get_lab_file_url(&self, token: &str, file_path: &str) -> ApiResult<LabFileUrl>;
    /// Streams the body at `url` into `out`, returning the number of bytes written.
    fn download_to(&self, url: &str, out: &mut dyn Write) -> ApiResult<u64>;
}

impl LabApi for ApiClient {
    fn get_lab_info(&self, token: &str) -> ApiResult<LabInfo> {
        let url = self.url(&format!("/labs/{}", token));
        self.send_json(self.client.get(&url), &url)
    }

    fn list_lab_files(&self, token: &str, public_only: bool) -> ApiResult<Vec<LabFile>> {
        let path = if public_only {
            format!("/labs/{}/files/public", token)
        } else {
            format!("/labs/{}/files", token)
        };
        let url = self.url(&path);
        let listing: LabFileListing = self.send_json(self.client.get(&url), &url)?;
        Ok(listing.into_files())
    }

    fn get_lab_file_url(&self, token: &str, file_path: &str) -> ApiResult<LabFileUrl> {
        let url = self.url(&format!("/labs/{}/files/{}", token, file_path));
        self.send_json(self.client.get(&url), &url)
    }

    fn download_to(&self, url: &str, out: &mut dyn Write) -> ApiResult<u64> {
        // Pre-signed storage URLs are absolute and not under the API base URL.
        let mut response = self.send(self.client.get(url), url)?;
        response.copy_to(out).map_err(ApiError::Transport)
    }
}
