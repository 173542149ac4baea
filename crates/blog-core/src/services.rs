//! The full set of domain services, wired to one store.

use std::sync::Arc;

use crate::comments::CommentService;
use crate::likes::LikeService;
use crate::posts::PostService;
use crate::store::BlogStore;

/// Post, comment, and like services sharing a single store.
#[derive(Clone)]
pub struct BlogServices {
    /// Post operations and counter maintenance.
    pub posts: PostService,
    /// Comment operations.
    pub comments: CommentService,
    /// Like operations.
    pub likes: LikeService,
}

impl BlogServices {
    /// Construct every service over the given store.
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self {
            posts: PostService::new(Arc::clone(&store)),
            comments: CommentService::new(Arc::clone(&store)),
            likes: LikeService::new(store),
        }
    }
}
