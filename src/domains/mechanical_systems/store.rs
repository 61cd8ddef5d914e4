use crate::domains::core::form_store;
use crate::errors::CollectionBoundsError;
use crate::types::RecordId;

use super::types::{
    Electrical, Elevators, FireProtection, FreightElevatorPatch, HvacDistribution, HvacEquipment,
    LifeSafety, MechanicalStep, MechanicalSummary, PassengerElevatorPatch, Plumbing,
    UnitManufacturerPatch, WaterHeaterPatch, WaterHeaters,
};

form_store! {
    /// Mechanical Systems questionnaire
    pub struct MechanicalSystems {
        form: MechanicalSystems,
        key: MechanicalStep,
        steps {
            hvac_equipment: HvacEquipment,
            hvac_distribution: HvacDistribution,
            plumbing: Plumbing,
            water_heaters: WaterHeaters,
            electrical: Electrical,
            elevators: Elevators,
            fire_protection: FireProtection,
            life_safety: LifeSafety,
            summary: MechanicalSummary,
        }
    }
}

impl MechanicalSystems {
    pub fn add_unit_manufacturer(&mut self, patch: UnitManufacturerPatch) -> RecordId {
        self.hvac_equipment.edit(|step| step.unit_manufacturers.add(patch))
    }

    pub fn update_unit_manufacturer(&mut self, id: RecordId, patch: UnitManufacturerPatch) -> bool {
        self.hvac_equipment
            .edit_when(|step| step.unit_manufacturers.update(id, patch))
    }

    pub fn remove_unit_manufacturer(&mut self, id: RecordId) -> bool {
        self.hvac_equipment.edit_when(|step| step.unit_manufacturers.remove(id))
    }

    pub fn add_water_heater(&mut self, patch: WaterHeaterPatch) -> RecordId {
        self.water_heaters.edit(|step| step.water_heaters.add(patch))
    }

    pub fn update_water_heater(&mut self, id: RecordId, patch: WaterHeaterPatch) -> bool {
        self.water_heaters.edit_when(|step| step.water_heaters.update(id, patch))
    }

    pub fn remove_water_heater(&mut self, id: RecordId) -> bool {
        self.water_heaters.edit_when(|step| step.water_heaters.remove(id))
    }

    /// Fails once five passenger elevators are recorded; the step is left untouched.
    pub fn add_passenger_elevator(
        &mut self,
        patch: PassengerElevatorPatch,
    ) -> Result<RecordId, CollectionBoundsError> {
        self.elevators.try_edit(|step| step.passenger_elevators.add(patch))
    }

    pub fn update_passenger_elevator(&mut self, id: RecordId, patch: PassengerElevatorPatch) -> bool {
        self.elevators
            .edit_when(|step| step.passenger_elevators.update(id, patch))
    }

    pub fn remove_passenger_elevator(&mut self, id: RecordId) -> bool {
        self.elevators.edit_when(|step| step.passenger_elevators.remove(id))
    }

    pub fn add_freight_elevator(
        &mut self,
        patch: FreightElevatorPatch,
    ) -> Result<RecordId, CollectionBoundsError> {
        self.elevators.try_edit(|step| step.freight_elevators.add(patch))
    }

    pub fn update_freight_elevator(&mut self, id: RecordId, patch: FreightElevatorPatch) -> bool {
        self.elevators.edit_when(|step| step.freight_elevators.update(id, patch))
    }

    pub fn remove_freight_elevator(&mut self, id: RecordId) -> bool {
        self.elevators.edit_when(|step| step.freight_elevators.remove(id))
    }
}
