use serde::{Deserialize, Serialize};

/// Editable attributes of one product draft.
///
/// Every value is kept as text exactly as typed; numeric attributes are
/// only parsed by validation and by the create-record service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price: String,
    pub main_category: String,
    pub sub_category: String,
    pub breeder: String,
    pub sex: String,
    pub age: String,
    pub size_cm: String,
    pub size_in: String,
}

/// Addressable attribute of [`ProductFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Title,
    Description,
    Price,
    MainCategory,
    SubCategory,
    Breeder,
    Sex,
    Age,
    SizeCm,
    SizeIn,
}

impl FieldKey {
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Title,
        FieldKey::Description,
        FieldKey::Price,
        FieldKey::MainCategory,
        FieldKey::SubCategory,
        FieldKey::Breeder,
        FieldKey::Sex,
        FieldKey::Age,
        FieldKey::SizeCm,
        FieldKey::SizeIn,
    ];

    /// Fields whose valid values depend on this one. Changing this field
    /// resets every dependent to empty.
    pub fn dependents(self) -> &'static [FieldKey] {
        match self {
            FieldKey::MainCategory => &[FieldKey::SubCategory],
            _ => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Title => "Title",
            FieldKey::Description => "Description",
            FieldKey::Price => "Price",
            FieldKey::MainCategory => "Main Category",
            FieldKey::SubCategory => "Sub Category",
            FieldKey::Breeder => "Breeder",
            FieldKey::Sex => "Sex",
            FieldKey::Age => "Age (yr)",
            FieldKey::SizeCm => "Size (cm)",
            FieldKey::SizeIn => "Size (in)",
        }
    }
}

impl ProductFields {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Title => &self.title,
            FieldKey::Description => &self.description,
            FieldKey::Price => &self.price,
            FieldKey::MainCategory => &self.main_category,
            FieldKey::SubCategory => &self.sub_category,
            FieldKey::Breeder => &self.breeder,
            FieldKey::Sex => &self.sex,
            FieldKey::Age => &self.age,
            FieldKey::SizeCm => &self.size_cm,
            FieldKey::SizeIn => &self.size_in,
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::Title => &mut self.title,
            FieldKey::Description => &mut self.description,
            FieldKey::Price => &mut self.price,
            FieldKey::MainCategory => &mut self.main_category,
            FieldKey::SubCategory => &mut self.sub_category,
            FieldKey::Breeder => &mut self.breeder,
            FieldKey::Sex => &mut self.sex,
            FieldKey::Age => &mut self.age,
            FieldKey::SizeCm => &mut self.size_cm,
            FieldKey::SizeIn => &mut self.size_in,
        }
    }

    /// Writes one field and clears its declared dependents. Writing the
    /// value a field already holds changes nothing. Returns whether any
    /// field changed.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.slot_mut(key);
        if *slot == value {
            return false;
        }
        *slot = value;
        for dependent in key.dependents() {
            self.slot_mut(*dependent).clear();
        }
        true
    }

    /// True when no attribute holds any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        FieldKey::ALL.iter().all(|key| self.get(*key).trim().is_empty())
    }
}
