// Helper for generating UUIDv7 (timestamp-sortable UUIDs)
//
// Chirps are listed in creation order, so their IDs are generated app-side
// as UUIDv7. Users keep PG's gen_random_uuid() (v4).

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
