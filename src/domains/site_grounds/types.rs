use crate::domains::core::{section, Checklist, YesNo};

section! {
    pub struct Topography / TopographyPatch {
        slope: list(String),
        description: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct StormDrainage / StormDrainagePatch {
        systems: list(String),
        ponding_observed: value(Option<YesNo>),
        erosion_observed: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    /// Step 1
    pub struct TopographyDrainage / TopographyDrainagePatch {
        topography: merge(Topography),
        storm_drainage: merge(StormDrainage),
        comments: value(String),
    }
}

section! {
    pub struct Paving / PavingPatch {
        not_applicable: value(bool),
        materials: list(String),
        parking_spaces: value(String),
        accessible_spaces: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct Curbs / CurbsPatch {
        not_applicable: value(bool),
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Sidewalks / SidewalksPatch {
        not_applicable: value(bool),
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 2
    pub struct PavingCurbsSidewalks / PavingCurbsSidewalksPatch {
        paving: merge(Paving),
        curbs: merge(Curbs),
        sidewalks: merge(Sidewalks),
        comments: value(String),
    }
}

section! {
    pub struct Landscaping / LandscapingPatch {
        not_applicable: value(bool),
        features: list(String),
        irrigation: value(Checklist),
        assessment: assessment,
    }
}

section! {
    pub struct Signage / SignagePatch {
        not_applicable: value(bool),
        types: list(String),
        illuminated: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    pub struct Fencing / FencingPatch {
        not_applicable: value(bool),
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 3
    pub struct LandscapingSignage / LandscapingSignagePatch {
        landscaping: merge(Landscaping),
        signage: merge(Signage),
        fencing: merge(Fencing),
        comments: value(String),
    }
}

section! {
    pub struct SiteUtilities / SiteUtilitiesPatch {
        /// Utility name to "served by public provider"
        providers: value(Checklist),
        notes: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct SiteLighting / SiteLightingPatch {
        not_applicable: value(bool),
        fixture_types: list(String),
        pole_mounted: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    /// Step 4
    pub struct UtilitiesLighting / UtilitiesLightingPatch {
        utilities: merge(SiteUtilities),
        lighting: merge(SiteLighting),
        comments: value(String),
    }
}

section! {
    pub struct Amenities / AmenitiesPatch {
        not_applicable: value(bool),
        features: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct RetainingWalls / RetainingWallsPatch {
        not_applicable: value(bool),
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    /// Step 5
    pub struct AmenitiesWalls / AmenitiesWallsPatch {
        amenities: merge(Amenities),
        retaining_walls: merge(RetainingWalls),
        comments: value(String),
    }
}
