//! Service layer providing the comic catalogue operations on top of `models`.
//! - `comics::service::ComicService` is the contract the HTTP layer talks to.
//! - Storage is pluggable through `comics::repository::ComicRepository`.
//! - Validation reuses the field validators in `models::comic`.

pub mod errors;
pub mod comics;
#[cfg(test)]
pub mod test_support;

pub use comics::{
    domain::{Comic, ComicFilter, ComicPage, ComicPatch, NewComic},
    memory::MemoryComicRepository,
    postgres::PgComicRepository,
    repository::ComicRepository,
    service::ComicService,
};
