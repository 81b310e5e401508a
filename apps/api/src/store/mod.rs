// Local persistence for the form.
// `kv` abstracts the storage mechanism; `form_store` owns the FormState blob
// and the debounced writer.

pub mod form_store;
pub mod kv;

pub use form_store::{DebouncedSaver, FormStore, SAVE_DEBOUNCE};
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
