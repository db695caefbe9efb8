use uuid::Uuid;

/// Descriptor metadata of a characteristic. Values are never fetched by the
/// detail screen, only listed.
#[derive(Debug, Ord, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub uuid: Uuid,
    pub service_uuid: Uuid,
    pub characteristic_uuid: Uuid,
}
