use pnet::util::MacAddr;

/// The organization an assignment block is registered to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Organization {
    pub name: String,
    pub address: String,
}

impl Organization {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Resolves a hardware address to the organization behind it.
pub trait VendorRepository {
    fn get_vendor(&self, mac: MacAddr) -> Option<&Organization>;
}
