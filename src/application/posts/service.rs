use std::sync::Arc;

use crate::application::clock::Clock;
use crate::application::repos::{PostsRepo, PostsWriteRepo};

/// Post use-cases shared by every handler. Built once at startup and cloned into request state.
#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reader,
            writer,
            clock,
        }
    }
}
