use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Member {
    pub name: String,
    pub type_name: String,
    pub offset: usize,
    pub size: usize,
    pub is_reference: bool,
}

/// Wire-layout description of one record shape. A `size` of zero marks a
/// dynamically sized record that needs a custom reader.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserDefinedType {
    pub name: String,
    pub size: usize,
    pub members: Vec<Member>,
    pub is_reference: bool,
    #[serde(skip)]
    pub secondary_udts: Vec<UserDefinedType>, // udts of members
}

pub trait Reflect {
    fn reflect() -> UserDefinedType;
}
