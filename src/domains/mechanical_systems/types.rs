use serde::{Deserialize, Serialize};

use crate::domains::core::{section, AtMost, Checklist, Record, RecordCollection, StepKey, YesNo};

/// Most elevators of one class a property record holds
pub const MAX_ELEVATORS: usize = 5;

/// Steps of the Mechanical Systems form, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MechanicalStep {
    HvacEquipment,
    HvacDistribution,
    Plumbing,
    WaterHeaters,
    Electrical,
    Elevators,
    FireProtection,
    LifeSafety,
    Summary,
}

impl MechanicalStep {
    pub const ALL: [MechanicalStep; 9] = [
        MechanicalStep::HvacEquipment,
        MechanicalStep::HvacDistribution,
        MechanicalStep::Plumbing,
        MechanicalStep::WaterHeaters,
        MechanicalStep::Electrical,
        MechanicalStep::Elevators,
        MechanicalStep::FireProtection,
        MechanicalStep::LifeSafety,
        MechanicalStep::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MechanicalStep::HvacEquipment => "hvacEquipment",
            MechanicalStep::HvacDistribution => "hvacDistribution",
            MechanicalStep::Plumbing => "plumbing",
            MechanicalStep::WaterHeaters => "waterHeaters",
            MechanicalStep::Electrical => "electrical",
            MechanicalStep::Elevators => "elevators",
            MechanicalStep::FireProtection => "fireProtection",
            MechanicalStep::LifeSafety => "lifeSafety",
            MechanicalStep::Summary => "summary",
        }
    }
}

impl StepKey for MechanicalStep {
    const COUNT: u8 = 9;

    fn first() -> Self {
        MechanicalStep::HvacEquipment
    }

    fn from_ordinal(ordinal: u8) -> Option<Self> {
        ordinal
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(usize::from(index)))
            .copied()
    }

    fn ordinal(&self) -> u8 {
        *self as u8 + 1
    }

    fn label(&self) -> String {
        self.as_str().to_string()
    }
}

section! {
    pub struct PackagedUnits / PackagedUnitsPatch {
        not_applicable: value(bool),
        types: list(String),
        quantity: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct SplitSystems / SplitSystemsPatch {
        not_applicable: value(bool),
        types: list(String),
        quantity: value(String),
        assessment: assessment,
    }
}

section! {
    /// Boilers, chillers and cooling towers
    pub struct CentralPlant / CentralPlantPatch {
        not_applicable: value(bool),
        equipment: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct UnitManufacturer / UnitManufacturerPatch {
        equipment_type: value(String),
        manufacturer: value(String),
        model: value(String),
        serial_number: value(String),
        year_installed: value(String),
        capacity: value(String),
        assessment: assessment,
    }
}

impl Record for UnitManufacturer {
    const KIND: &'static str = "unitManufacturers";
}

section! {
    pub struct HvacEquipment / HvacEquipmentPatch {
        packaged_units: merge(PackagedUnits),
        split_systems: merge(SplitSystems),
        central_plant: merge(CentralPlant),
        comments: value(String),
    }
    collections {
        unit_manufacturers: RecordCollection<UnitManufacturer>,
    }
}

section! {
    pub struct Ductwork / DuctworkPatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct HvacControls / HvacControlsPatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Ventilation / VentilationPatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct HvacDistribution / HvacDistributionPatch {
        ductwork: merge(Ductwork),
        controls: merge(HvacControls),
        ventilation: merge(Ventilation),
        comments: value(String),
    }
}

section! {
    pub struct SupplyPiping / SupplyPipingPatch {
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct WastePiping / WastePipingPatch {
        materials: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct PlumbingFixtures / PlumbingFixturesPatch {
        types: list(String),
        low_flow: value(Option<YesNo>),
        assessment: assessment,
    }
}

section! {
    pub struct Plumbing / PlumbingPatch {
        supply_piping: merge(SupplyPiping),
        waste_piping: merge(WastePiping),
        fixtures: merge(PlumbingFixtures),
        comments: value(String),
    }
}

section! {
    pub struct DomesticHotWater / DomesticHotWaterPatch {
        system_types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct WaterHeater / WaterHeaterPatch {
        manufacturer: value(String),
        fuel_type: value(String),
        capacity_gallons: value(String),
        year_installed: value(String),
        location: value(String),
        assessment: assessment,
    }
}

impl Record for WaterHeater {
    const KIND: &'static str = "waterHeaters";
}

section! {
    pub struct WaterHeaters / WaterHeatersPatch {
        domestic_hot_water: merge(DomesticHotWater),
        comments: value(String),
    }
    collections {
        water_heaters: RecordCollection<WaterHeater>,
    }
}

section! {
    pub struct ElectricalService / ElectricalServicePatch {
        amperage: value(String),
        voltage: value(String),
        phases: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct ElectricalDistribution / ElectricalDistributionPatch {
        panel_manufacturers: list(String),
        wiring_types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct EmergencyPower / EmergencyPowerPatch {
        not_applicable: value(bool),
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Electrical / ElectricalPatch {
        service: merge(ElectricalService),
        distribution: merge(ElectricalDistribution),
        emergency_power: merge(EmergencyPower),
        comments: value(String),
    }
}

section! {
    pub struct PassengerElevator / PassengerElevatorPatch {
        manufacturer: value(String),
        drive_type: value(String),
        capacity_lbs: value(String),
        floors_served: value(String),
        cab_finishes: list(String),
        last_inspection: value(String),
        assessment: assessment,
    }
}

impl Record for PassengerElevator {
    const KIND: &'static str = "passengerElevators";
}

section! {
    pub struct FreightElevator / FreightElevatorPatch {
        manufacturer: value(String),
        drive_type: value(String),
        capacity_lbs: value(String),
        floors_served: value(String),
        gate_type: value(String),
        last_inspection: value(String),
        assessment: assessment,
    }
}

impl Record for FreightElevator {
    const KIND: &'static str = "freightElevators";
}

section! {
    pub struct ElevatorMachineRoom / ElevatorMachineRoomPatch {
        not_applicable: value(bool),
        location: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct Elevators / ElevatorsPatch {
        machine_room: merge(ElevatorMachineRoom),
        comments: value(String),
    }
    collections {
        passenger_elevators: RecordCollection<PassengerElevator, AtMost<MAX_ELEVATORS>>,
        freight_elevators: RecordCollection<FreightElevator, AtMost<MAX_ELEVATORS>>,
    }
}

section! {
    pub struct Sprinklers / SprinklersPatch {
        not_applicable: value(bool),
        system_types: list(String),
        last_inspection: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct FireAlarm / FireAlarmPatch {
        panel_manufacturer: value(String),
        devices: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct Extinguishers / ExtinguishersPatch {
        last_inspection: value(String),
        assessment: assessment,
    }
}

section! {
    pub struct FireProtection / FireProtectionPatch {
        sprinklers: merge(Sprinklers),
        alarms: merge(FireAlarm),
        extinguishers: merge(Extinguishers),
        comments: value(String),
    }
}

section! {
    pub struct EmergencyLighting / EmergencyLightingPatch {
        types: list(String),
        assessment: assessment,
    }
}

section! {
    pub struct SecuritySystems / SecuritySystemsPatch {
        /// System name to "present"
        systems: value(Checklist),
        assessment: assessment,
    }
}

section! {
    pub struct LifeSafety / LifeSafetyPatch {
        emergency_lighting: merge(EmergencyLighting),
        security: merge(SecuritySystems),
        comments: value(String),
    }
}

section! {
    /// Closing page: overall opinion of the mechanical systems
    pub struct MechanicalSummary / MechanicalSummaryPatch {
        summary_notes: value(String),
        recommended_studies: list(String),
        comments: value(String),
        assessment: assessment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_ordinals_follow_page_order() {
        for (index, step) in MechanicalStep::ALL.iter().enumerate() {
            assert_eq!(usize::from(step.ordinal()), index + 1);
            assert_eq!(MechanicalStep::from_ordinal(step.ordinal()), Some(*step));
        }
        assert_eq!(MechanicalStep::from_ordinal(0), None);
        assert_eq!(MechanicalStep::from_ordinal(10), None);
        assert_eq!(usize::from(MechanicalStep::COUNT), MechanicalStep::ALL.len());
    }

    #[test]
    fn test_step_wire_names() {
        assert_eq!(
            serde_json::to_string(&MechanicalStep::WaterHeaters).unwrap(),
            "\"waterHeaters\""
        );
        for step in MechanicalStep::ALL {
            let json = serde_json::to_value(step).unwrap();
            assert_eq!(json, serde_json::json!(step.as_str()));
        }
    }
}
