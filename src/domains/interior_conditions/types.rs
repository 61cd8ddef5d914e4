use crate::domains::core::{section, Checklist, ChecklistItem, Record, RecordCollection, YesNo};

section! {
    pub struct Lobbies / LobbiesPatch {
        not_applicable: value(bool),
        /// Finish name ("floor", "walls", "ceiling") to "in acceptable condition"
        finishes: value(Checklist),
        assessment: assessment,
    }
}

section! {
    pub struct Corridors / CorridorsPatch {
        not_applicable: value(bool),
        flooring: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Stairwells / StairwellsPatch {
        not_applicable: value(bool),
        handrails_present: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    /// Step 1
    pub struct CommonAreas / CommonAreasPatch {
        lobbies: merge(Lobbies),
        corridors: merge(Corridors),
        stairwells: merge(Stairwells),
        comments: value(String),
    }
}

section! {
    pub struct CommonRestrooms / CommonRestroomsPatch {
        not_applicable: value(bool),
        count: value(String),
        fixtures: list(String),
        ada_compliant: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    /// Step 2
    pub struct Restrooms / RestroomsPatch {
        common_restrooms: merge(CommonRestrooms),
        comments: value(String),
    }
}

section! {
    pub struct TenantSpace / TenantSpacePatch {
        suite_number: value(String),
        tenant_name: value(String),
        use_type: value(String),
        flooring: list(String),
        ceilings: list(String),
        assessment: assessment,
    }
}

impl Record for TenantSpace {
    const KIND: &'static str = "tenantSpaces";
}

section! {
    /// Step 3
    pub struct TenantSpaces / TenantSpacesPatch {
        vacant_spaces_observed: value(Option<YesNo>),
        comments: value(String),
    }
    collections {
        tenant_spaces: RecordCollection<TenantSpace>,
    }
}

section! {
    /// Step 4: accessibility survey
    pub struct Accessibility / AccessibilityPatch {
        ada_items: list(ChecklistItem),
        parking_compliant: value(Option<YesNo>),
        entrance_compliant: value(Option<YesNo>),
        notes: value(String),
        assessment: assessment,
    }
}
