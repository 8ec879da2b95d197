//! In-memory doubles for the pipeline's capabilities.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ai_llm_service::{AiLlmError, TextEmbedder, TextGenerator};
use async_trait::async_trait;
use recipe_retrieval::store::RecipeStore;
use recipe_retrieval::vector_index::{Neighbor, SimilarityIndex};
use recipe_retrieval::{RetrievalError, StoredRecipe};
use services::{ImageLookup, ImageLookupError};

pub fn stored(id: i64, name: &str, ingredients: &[&str]) -> StoredRecipe {
    StoredRecipe {
        id,
        name: name.to_string(),
        ingredients_tokenized: ingredients.iter().map(|s| s.to_string()).collect(),
        data_source: "food.com".into(),
        ..StoredRecipe::default()
    }
}

pub struct FixedEmbedder {
    pub dim: usize,
    pub seen: Mutex<Vec<String>>,
}

impl FixedEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextEmbedder for FixedEmbedder {
    async fn embed(&self, text: &str) -> ai_llm_service::Result<Vec<f32>> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(vec![0.5; self.dim])
    }
}

/// Returns `ids` as neighbors in order, padded by repeating the last id.
pub struct ListIndex {
    pub ids: Vec<i64>,
    pub requested_k: Mutex<Option<usize>>,
}

impl ListIndex {
    pub fn new(ids: Vec<i64>) -> Self {
        Self {
            ids,
            requested_k: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SimilarityIndex for ListIndex {
    async fn search(&self, _vector: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        *self.requested_k.lock().unwrap() = Some(k);
        let last = *self
            .ids
            .last()
            .ok_or_else(|| RetrievalError::IndexUnavailable("empty".into()))?;
        Ok((0..k)
            .map(|i| Neighbor {
                id: self.ids.get(i).copied().unwrap_or(last),
                distance: i as f32,
            })
            .collect())
    }
}

pub struct MemoryStore {
    rows: Vec<StoredRecipe>,
    fail_fetch: bool,
    fail_updates: bool,
    pub fetched: Mutex<Vec<Vec<i64>>>,
    pub updates: Mutex<Vec<(i64, String)>>,
}

impl MemoryStore {
    pub fn new(rows: Vec<StoredRecipe>) -> Self {
        Self {
            rows,
            fail_fetch: false,
            fail_updates: false,
            fetched: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.fail_fetch = true;
        self
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn fetch(&self, ids: &[i64]) -> Result<Vec<StoredRecipe>, RetrievalError> {
        if self.fail_fetch {
            return Err(RetrievalError::StoreUnavailable("connection refused".into()));
        }
        let ids = recipe_retrieval::store::dedup_ids(ids);
        self.fetched.lock().unwrap().push(ids.clone());
        Ok(self
            .rows
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn update_image_url(&self, id: i64, url: &str) -> Result<(), RetrievalError> {
        if self.fail_updates {
            return Err(RetrievalError::StoreUnavailable("read-only replica".into()));
        }
        self.updates.lock().unwrap().push((id, url.to_string()));
        Ok(())
    }
}

pub struct StaticImages {
    url: String,
    calls: AtomicUsize,
}

impl StaticImages {
    pub fn found(url: &str) -> Self {
        Self {
            url: url.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageLookup for StaticImages {
    async fn lookup(&self, _name: &str) -> Result<String, ImageLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.url.clone())
    }
}

pub enum Reply {
    Text(&'static str),
    Hang,
    Exit,
}

/// Text generator that plays back scripted replies.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> ai_llm_service::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Exit);
        match reply {
            Reply::Text(s) => Ok(s.to_string()),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(String::new())
            }
            Reply::Exit => Err(AiLlmError::ProcessExit {
                code: Some(1),
                stderr: "killed".into(),
            }),
        }
    }
}
