mod id;
mod types;

pub use id::{InvalidRecordId, RecordId};
pub use types::{
    Entity, Record, UpdateOutcome, CREATED_AT_FIELD, DELETED_AT_FIELD, ID_FIELD, RESERVED_FIELDS,
    UPDATED_AT_FIELD,
};
