use crate::domains::core::{section, Record, RecordCollection};

section! {
    /// Step 1: who, where and when
    pub struct ProjectInformation / ProjectInformationPatch {
        project_name: value(String),
        project_number: value(String),
        address: value(String),
        city: value(String),
        state: value(String),
        zip_code: value(String),
        inspection_date: value(String),
        inspector_name: value(String),
        client_name: value(String),
        weather_conditions: list(String),
        temperature: value(String),
        comments: value(String),
    }
}

section! {
    /// Step 2: the property as built
    pub struct PropertyDescription / PropertyDescriptionPatch {
        property_type: list(String),
        year_built: value(String),
        number_of_buildings: value(String),
        number_of_stories: value(String),
        gross_building_area: value(String),
        site_area_acres: value(String),
        occupancy_percent: value(String),
        construction_type: list(String),
        comments: value(String),
    }
}

section! {
    /// Someone interviewed on site
    pub struct Personnel / PersonnelPatch {
        name: value(String),
        title: value(String),
        company: value(String),
        phone: value(String),
        email: value(String),
        years_at_property: value(String),
        notes: value(String),
    }
}

impl Record for Personnel {
    const KIND: &'static str = "personnelInterviewed";
}

section! {
    /// Step 3: interviews and documents reviewed
    pub struct PersonnelDocuments / PersonnelDocumentsPatch {
        documents_reviewed: list(String),
        comments: value(String),
    }
    collections {
        personnel_interviewed: RecordCollection<Personnel>,
    }
}

section! {
    pub struct Tenant / TenantPatch {
        name: value(String),
        unit_number: value(String),
        square_feet: value(String),
        lease_type: value(String),
        occupancy_status: value(String),
        contact_name: value(String),
        contact_phone: value(String),
        notes: value(String),
    }
}

impl Record for Tenant {
    const KIND: &'static str = "tenants";
}

section! {
    /// Step 4: rent roll as observed
    pub struct TenantInformation / TenantInformationPatch {
        comments: value(String),
    }
    collections {
        tenants: RecordCollection<Tenant>,
    }
}
