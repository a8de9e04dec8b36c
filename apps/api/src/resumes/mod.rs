// Résumé ingestion: upload, listing, raw download and deletion.
// Question generation over a stored résumé lives in `interview`.

pub mod handlers;
pub mod repository;
pub mod storage;
