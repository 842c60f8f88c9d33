//! Unstored API calls.
//!
//! Requests whose responses the session does not cache. Each issues one
//! request and hands back the decoded JSON; the store and undo history are
//! never touched.

use crate::services::error::Result;
use crate::services::sync_service::SyncService;
use crate::transport::Request;
use serde_json::{json, Value};

impl SyncService {
    pub async fn process_answer(&self, review_point_id: &str, data: Value) -> Result<Value> {
        self.send(Request::post(
            format!("/api/reviews/{}/answer", review_point_id),
            data,
        ))
        .await
    }

    pub async fn remove_from_review(&self, review_point_id: &str) -> Result<Value> {
        self.send(Request::post(
            format!("/api/review-points/{}/remove", review_point_id),
            json!({}),
        ))
        .await
    }

    pub async fn review_overview(&self) -> Result<Value> {
        self.send(Request::get("/api/reviews/overview")).await
    }

    pub async fn get_review_setting(&self, note_id: &str) -> Result<Value> {
        self.send(Request::get(format!("/api/notes/{}/review-setting", note_id)))
            .await
    }

    pub async fn update_review_setting(&self, note_id: &str, data: Value) -> Result<Value> {
        self.send(Request::post(
            format!("/api/notes/{}/review-setting", note_id),
            data,
        ))
        .await
    }

    pub async fn get_circle(&self, circle_id: &str) -> Result<Value> {
        self.send(Request::get(format!("/api/circles/{}", circle_id)))
            .await
    }

    pub async fn get_circles_of_current_user(&self) -> Result<Value> {
        self.send(Request::get("/api/circles")).await
    }

    pub async fn create_circle(&self, data: Value) -> Result<Value> {
        self.send(Request::post("/api/circles", data).as_form())
            .await
    }

    pub async fn join_circle(&self, data: Value) -> Result<Value> {
        self.send(Request::post("/api/circles/join", data).as_form())
            .await
    }

    /// Search notes linkable from `note_id`, optionally across all notebooks
    pub async fn relative_search(
        &self,
        note_id: &str,
        search_globally: bool,
        search_key: &str,
    ) -> Result<Value> {
        self.send(Request::post(
            format!("/api/notes/{}/search", note_id),
            json!({ "searchGlobally": search_globally, "searchKey": search_key }),
        ))
        .await
    }
}
