use crate::domains::core::{section, YesNo};

section! {
    pub struct Foundation / FoundationPatch {
        types: list(String),
        settlement_observed: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    pub struct StructuralFrame / StructuralFramePatch {
        systems: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 1
    pub struct FoundationStructure / FoundationStructurePatch {
        foundation: merge(Foundation),
        framing: merge(StructuralFrame),
        comments: value(String),
    }
}

section! {
    pub struct Cladding / CladdingPatch {
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Sealants / SealantsPatch {
        not_applicable: value(bool),
        locations: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 2
    pub struct ExteriorWalls / ExteriorWallsPatch {
        cladding: merge(Cladding),
        sealants: merge(Sealants),
        comments: value(String),
    }
}

section! {
    pub struct Windows / WindowsPatch {
        frame_types: list(String),
        glazing: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct ExteriorDoors / ExteriorDoorsPatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 3
    pub struct WindowsDoors / WindowsDoorsPatch {
        windows: merge(Windows),
        doors: merge(ExteriorDoors),
        comments: value(String),
    }
}

section! {
    /// Guard railing. Only present once the parent answers `railing: yes`.
    pub struct RailingDetails / RailingDetailsPatch {
        materials: list(String),
        height_inches: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct RoofMaterial / RoofMaterialPatch {
        types: list(String),
        age_years: value(String),
        warranty: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    pub struct RoofDrainage / RoofDrainagePatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct RoofAccess / RoofAccessPatch {
        access_type: list(String),
        railing: value(Option<YesNo>),
        railing_details: nested(RailingDetails),
        assessment: assessment,
    }
}

section! {
    /// Step 4
    pub struct Roofing / RoofingPatch {
        roof_material: merge(RoofMaterial),
        roof_drainage: merge(RoofDrainage),
        roof_access: merge(RoofAccess),
        comments: value(String),
    }
}

section! {
    pub struct Balconies / BalconiesPatch {
        not_applicable: value(bool),
        materials: list(String),
        railing: value(Option<YesNo>),
        railing_details: nested(RailingDetails),
        assessment: assessment,
    }
}

section! {
    pub struct ExteriorStairs / ExteriorStairsPatch {
        not_applicable: value(bool),
        materials: list(String),
        railing: value(Option<YesNo>),
        railing_details: nested(RailingDetails),
        assessment: assessment,
    }
}

section! {
    /// Step 5
    pub struct BalconiesStairs / BalconiesStairsPatch {
        balconies: merge(Balconies),
        exterior_stairs: merge(ExteriorStairs),
        comments: value(String),
    }
}
