// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema - entity inheritance and named attributes
//!
//! STEP files carry upper-case type names (`IFCWALL`). The schema maps them
//! to their canonical spelling (`IfcWall`), answers subtype questions
//! (`IfcWall` is an `IfcObject`) and resolves attribute names to positions.
//!
//! The tables cover every `IfcRoot` subtype of IFC2X3, IFC4 and IFC4X3:
//! objects, relationships, property definitions and type objects. Type
//! objects follow their classes (`IfcPump` gives `IfcPumpType`), so only the
//! irregular ones are listed. Property classes are included for lookups.
//! Geometry and resource entities are not tabulated and relate to no
//! category.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

/// IFC schema release declared in `FILE_SCHEMA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    Ifc2x3,
    Ifc4,
    Ifc4x3,
}

impl SchemaVersion {
    /// Map a `FILE_SCHEMA` identifier to a release.
    ///
    /// Unrecognised identifiers fall back to IFC4.
    pub fn from_identifier(identifier: &str) -> Self {
        let upper = identifier.trim().to_ascii_uppercase();
        if upper.starts_with("IFC2X3") {
            Self::Ifc2x3
        } else if upper.starts_with("IFC4X3") {
            Self::Ifc4x3
        } else {
            Self::Ifc4
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ifc2x3 => "IFC2X3",
            Self::Ifc4 => "IFC4",
            Self::Ifc4x3 => "IFC4X3",
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::Ifc4
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (type, direct supertype) pairs shared by all releases, IFC4 layout.
/// Types of one release only are harmless in the others.
const HIERARCHY: &[(&str, &str)] = &[
    // Roots
    ("IfcObjectDefinition", "IfcRoot"),
    ("IfcPropertyDefinition", "IfcRoot"),
    ("IfcRelationship", "IfcRoot"),
    ("IfcObject", "IfcObjectDefinition"),
    ("IfcContext", "IfcObjectDefinition"),
    ("IfcTypeObject", "IfcObjectDefinition"),
    ("IfcProject", "IfcContext"),
    ("IfcProjectLibrary", "IfcContext"),
    // Object kinds
    ("IfcActor", "IfcObject"),
    ("IfcControl", "IfcObject"),
    ("IfcGroup", "IfcObject"),
    ("IfcProcess", "IfcObject"),
    ("IfcProduct", "IfcObject"),
    ("IfcResource", "IfcObject"),
    ("IfcOccupant", "IfcActor"),
    // Controls
    ("IfcActionRequest", "IfcControl"),
    ("IfcConditionCriterion", "IfcControl"),
    ("IfcCostItem", "IfcControl"),
    ("IfcCostSchedule", "IfcControl"),
    ("IfcEquipmentStandard", "IfcControl"),
    ("IfcFurnitureStandard", "IfcControl"),
    ("IfcPerformanceHistory", "IfcControl"),
    ("IfcPermit", "IfcControl"),
    ("IfcProjectOrder", "IfcControl"),
    ("IfcProjectOrderRecord", "IfcControl"),
    ("IfcScheduleTimeControl", "IfcControl"),
    ("IfcServiceLife", "IfcControl"),
    ("IfcSpaceProgram", "IfcControl"),
    ("IfcTimeSeriesSchedule", "IfcControl"),
    ("IfcWorkCalendar", "IfcControl"),
    ("IfcWorkControl", "IfcControl"),
    ("IfcWorkPlan", "IfcWorkControl"),
    ("IfcWorkSchedule", "IfcWorkControl"),
    // Groups
    ("IfcAsset", "IfcGroup"),
    ("IfcCondition", "IfcGroup"),
    ("IfcInventory", "IfcGroup"),
    ("IfcStructuralLoadGroup", "IfcGroup"),
    ("IfcStructuralLoadCase", "IfcStructuralLoadGroup"),
    ("IfcStructuralResultGroup", "IfcGroup"),
    ("IfcSystem", "IfcGroup"),
    ("IfcBuildingSystem", "IfcSystem"),
    ("IfcBuiltSystem", "IfcSystem"),
    ("IfcDistributionSystem", "IfcSystem"),
    ("IfcDistributionCircuit", "IfcDistributionSystem"),
    ("IfcElectricalCircuit", "IfcSystem"),
    ("IfcStructuralAnalysisModel", "IfcSystem"),
    ("IfcZone", "IfcSystem"),
    // Processes
    ("IfcEvent", "IfcProcess"),
    ("IfcProcedure", "IfcProcess"),
    ("IfcTask", "IfcProcess"),
    ("IfcMove", "IfcTask"),
    ("IfcOrderAction", "IfcTask"),
    // Resources
    ("IfcConstructionResource", "IfcResource"),
    ("IfcConstructionEquipmentResource", "IfcConstructionResource"),
    ("IfcConstructionMaterialResource", "IfcConstructionResource"),
    ("IfcConstructionProductResource", "IfcConstructionResource"),
    ("IfcCrewResource", "IfcConstructionResource"),
    ("IfcLaborResource", "IfcConstructionResource"),
    ("IfcSubContractResource", "IfcConstructionResource"),
    // Products
    ("IfcAnnotation", "IfcProduct"),
    ("IfcElement", "IfcProduct"),
    ("IfcLinearElement", "IfcProduct"),
    ("IfcPort", "IfcProduct"),
    ("IfcPositioningElement", "IfcProduct"),
    ("IfcProxy", "IfcProduct"),
    ("IfcSpatialElement", "IfcProduct"),
    ("IfcStructuralActivity", "IfcProduct"),
    ("IfcStructuralItem", "IfcProduct"),
    ("IfcDistributionPort", "IfcPort"),
    ("IfcAlignmentCant", "IfcLinearElement"),
    ("IfcAlignmentHorizontal", "IfcLinearElement"),
    ("IfcAlignmentSegment", "IfcLinearElement"),
    ("IfcAlignmentVertical", "IfcLinearElement"),
    ("IfcGrid", "IfcPositioningElement"),
    ("IfcLinearPositioningElement", "IfcPositioningElement"),
    ("IfcAlignment", "IfcLinearPositioningElement"),
    ("IfcReferent", "IfcPositioningElement"),
    // Spatial structure
    ("IfcSpatialStructureElement", "IfcSpatialElement"),
    ("IfcExternalSpatialStructureElement", "IfcSpatialElement"),
    ("IfcExternalSpatialElement", "IfcExternalSpatialStructureElement"),
    ("IfcSpatialZone", "IfcSpatialElement"),
    ("IfcBuilding", "IfcSpatialStructureElement"),
    ("IfcBuildingStorey", "IfcSpatialStructureElement"),
    ("IfcSite", "IfcSpatialStructureElement"),
    ("IfcSpace", "IfcSpatialStructureElement"),
    ("IfcFacility", "IfcSpatialStructureElement"),
    ("IfcFacilityPart", "IfcSpatialStructureElement"),
    ("IfcBridge", "IfcFacility"),
    ("IfcMarineFacility", "IfcFacility"),
    ("IfcRailway", "IfcFacility"),
    ("IfcRoad", "IfcFacility"),
    ("IfcBridgePart", "IfcFacilityPart"),
    ("IfcFacilityPartCommon", "IfcFacilityPart"),
    ("IfcMarinePart", "IfcFacilityPart"),
    ("IfcRailwayPart", "IfcFacilityPart"),
    ("IfcRoadPart", "IfcFacilityPart"),
    // Structural analysis
    ("IfcStructuralAction", "IfcStructuralActivity"),
    ("IfcStructuralReaction", "IfcStructuralActivity"),
    ("IfcStructuralPointAction", "IfcStructuralAction"),
    ("IfcStructuralCurveAction", "IfcStructuralAction"),
    ("IfcStructuralLinearAction", "IfcStructuralCurveAction"),
    ("IfcStructuralLinearActionVarying", "IfcStructuralLinearAction"),
    ("IfcStructuralSurfaceAction", "IfcStructuralAction"),
    ("IfcStructuralPlanarAction", "IfcStructuralSurfaceAction"),
    ("IfcStructuralPlanarActionVarying", "IfcStructuralPlanarAction"),
    ("IfcStructuralPointReaction", "IfcStructuralReaction"),
    ("IfcStructuralCurveReaction", "IfcStructuralReaction"),
    ("IfcStructuralSurfaceReaction", "IfcStructuralReaction"),
    ("IfcStructuralConnection", "IfcStructuralItem"),
    ("IfcStructuralMember", "IfcStructuralItem"),
    ("IfcStructuralPointConnection", "IfcStructuralConnection"),
    ("IfcStructuralCurveConnection", "IfcStructuralConnection"),
    ("IfcStructuralSurfaceConnection", "IfcStructuralConnection"),
    ("IfcStructuralCurveMember", "IfcStructuralMember"),
    ("IfcStructuralCurveMemberVarying", "IfcStructuralCurveMember"),
    ("IfcStructuralSurfaceMember", "IfcStructuralMember"),
    ("IfcStructuralSurfaceMemberVarying", "IfcStructuralSurfaceMember"),
    // Element families
    ("IfcBuildingElement", "IfcElement"),
    ("IfcBuiltElement", "IfcElement"),
    ("IfcCivilElement", "IfcElement"),
    ("IfcDistributionElement", "IfcElement"),
    ("IfcElementAssembly", "IfcElement"),
    ("IfcElementComponent", "IfcElement"),
    ("IfcElectricalElement", "IfcElement"),
    ("IfcEquipmentElement", "IfcElement"),
    ("IfcFeatureElement", "IfcElement"),
    ("IfcFurnishingElement", "IfcElement"),
    ("IfcGeographicElement", "IfcElement"),
    ("IfcGeotechnicalElement", "IfcElement"),
    ("IfcTransportElement", "IfcElement"),
    ("IfcTransportationDevice", "IfcElement"),
    ("IfcVirtualElement", "IfcElement"),
    // Building elements, moved under IfcBuiltElement in IFC4X3
    ("IfcBeam", "IfcBuildingElement"),
    ("IfcBeamStandardCase", "IfcBeam"),
    ("IfcBuildingElementComponent", "IfcBuildingElement"),
    ("IfcBuildingElementProxy", "IfcBuildingElement"),
    ("IfcChimney", "IfcBuildingElement"),
    ("IfcColumn", "IfcBuildingElement"),
    ("IfcColumnStandardCase", "IfcColumn"),
    ("IfcCovering", "IfcBuildingElement"),
    ("IfcCurtainWall", "IfcBuildingElement"),
    ("IfcDoor", "IfcBuildingElement"),
    ("IfcDoorStandardCase", "IfcDoor"),
    ("IfcFooting", "IfcBuildingElement"),
    ("IfcMember", "IfcBuildingElement"),
    ("IfcMemberStandardCase", "IfcMember"),
    ("IfcPile", "IfcBuildingElement"),
    ("IfcPlate", "IfcBuildingElement"),
    ("IfcPlateStandardCase", "IfcPlate"),
    ("IfcRailing", "IfcBuildingElement"),
    ("IfcRamp", "IfcBuildingElement"),
    ("IfcRampFlight", "IfcBuildingElement"),
    ("IfcRoof", "IfcBuildingElement"),
    ("IfcShadingDevice", "IfcBuildingElement"),
    ("IfcSlab", "IfcBuildingElement"),
    ("IfcSlabElementedCase", "IfcSlab"),
    ("IfcSlabStandardCase", "IfcSlab"),
    ("IfcStair", "IfcBuildingElement"),
    ("IfcStairFlight", "IfcBuildingElement"),
    ("IfcWall", "IfcBuildingElement"),
    ("IfcWallElementedCase", "IfcWall"),
    ("IfcWallStandardCase", "IfcWall"),
    ("IfcWindow", "IfcBuildingElement"),
    ("IfcWindowStandardCase", "IfcWindow"),
    // Infrastructure elements
    ("IfcBearing", "IfcBuiltElement"),
    ("IfcCourse", "IfcBuiltElement"),
    ("IfcDeepFoundation", "IfcBuiltElement"),
    ("IfcCaissonFoundation", "IfcDeepFoundation"),
    ("IfcEarthworksElement", "IfcBuiltElement"),
    ("IfcEarthworksFill", "IfcEarthworksElement"),
    ("IfcReinforcedSoil", "IfcEarthworksElement"),
    ("IfcKerb", "IfcBuiltElement"),
    ("IfcMooringDevice", "IfcBuiltElement"),
    ("IfcNavigationElement", "IfcBuiltElement"),
    ("IfcPavement", "IfcBuiltElement"),
    ("IfcRail", "IfcBuiltElement"),
    ("IfcTrackElement", "IfcBuiltElement"),
    ("IfcGeotechnicalAssembly", "IfcGeotechnicalElement"),
    ("IfcGeotechnicalStratum", "IfcGeotechnicalElement"),
    ("IfcBorehole", "IfcGeotechnicalAssembly"),
    ("IfcGeomodel", "IfcGeotechnicalAssembly"),
    ("IfcGeoslice", "IfcGeotechnicalAssembly"),
    ("IfcVehicle", "IfcTransportationDevice"),
    // Element components
    ("IfcBuildingElementPart", "IfcElementComponent"),
    ("IfcDiscreteAccessory", "IfcElementComponent"),
    ("IfcFastener", "IfcElementComponent"),
    ("IfcMechanicalFastener", "IfcElementComponent"),
    ("IfcReinforcingElement", "IfcElementComponent"),
    ("IfcReinforcingBar", "IfcReinforcingElement"),
    ("IfcReinforcingMesh", "IfcReinforcingElement"),
    ("IfcTendon", "IfcReinforcingElement"),
    ("IfcTendonAnchor", "IfcReinforcingElement"),
    ("IfcTendonConduit", "IfcReinforcingElement"),
    ("IfcVibrationIsolator", "IfcElementComponent"),
    ("IfcVibrationDamper", "IfcElementComponent"),
    ("IfcImpactProtectionDevice", "IfcElementComponent"),
    ("IfcSign", "IfcElementComponent"),
    // Features
    ("IfcFeatureElementAddition", "IfcFeatureElement"),
    ("IfcFeatureElementSubtraction", "IfcFeatureElement"),
    ("IfcSurfaceFeature", "IfcFeatureElement"),
    ("IfcProjectionElement", "IfcFeatureElementAddition"),
    ("IfcOpeningElement", "IfcFeatureElementSubtraction"),
    ("IfcOpeningStandardCase", "IfcOpeningElement"),
    ("IfcVoidingFeature", "IfcFeatureElementSubtraction"),
    ("IfcEarthworksCut", "IfcFeatureElementSubtraction"),
    ("IfcEdgeFeature", "IfcFeatureElementSubtraction"),
    ("IfcChamferEdgeFeature", "IfcEdgeFeature"),
    ("IfcRoundedEdgeFeature", "IfcEdgeFeature"),
    // Furnishing
    ("IfcFurniture", "IfcFurnishingElement"),
    ("IfcSystemFurnitureElement", "IfcFurnishingElement"),
    // Distribution
    ("IfcDistributionControlElement", "IfcDistributionElement"),
    ("IfcDistributionFlowElement", "IfcDistributionElement"),
    ("IfcActuator", "IfcDistributionControlElement"),
    ("IfcAlarm", "IfcDistributionControlElement"),
    ("IfcController", "IfcDistributionControlElement"),
    ("IfcFlowInstrument", "IfcDistributionControlElement"),
    ("IfcProtectiveDeviceTrippingUnit", "IfcDistributionControlElement"),
    ("IfcSensor", "IfcDistributionControlElement"),
    ("IfcUnitaryControlElement", "IfcDistributionControlElement"),
    ("IfcDistributionChamberElement", "IfcDistributionFlowElement"),
    ("IfcEnergyConversionDevice", "IfcDistributionFlowElement"),
    ("IfcFlowController", "IfcDistributionFlowElement"),
    ("IfcFlowFitting", "IfcDistributionFlowElement"),
    ("IfcFlowMovingDevice", "IfcDistributionFlowElement"),
    ("IfcFlowSegment", "IfcDistributionFlowElement"),
    ("IfcFlowStorageDevice", "IfcDistributionFlowElement"),
    ("IfcFlowTerminal", "IfcDistributionFlowElement"),
    ("IfcFlowTreatmentDevice", "IfcDistributionFlowElement"),
    ("IfcAirToAirHeatRecovery", "IfcEnergyConversionDevice"),
    ("IfcBoiler", "IfcEnergyConversionDevice"),
    ("IfcBurner", "IfcEnergyConversionDevice"),
    ("IfcChiller", "IfcEnergyConversionDevice"),
    ("IfcCoil", "IfcEnergyConversionDevice"),
    ("IfcCondenser", "IfcEnergyConversionDevice"),
    ("IfcCooledBeam", "IfcEnergyConversionDevice"),
    ("IfcCoolingTower", "IfcEnergyConversionDevice"),
    ("IfcElectricGenerator", "IfcEnergyConversionDevice"),
    ("IfcElectricMotor", "IfcEnergyConversionDevice"),
    ("IfcEngine", "IfcEnergyConversionDevice"),
    ("IfcEvaporativeCooler", "IfcEnergyConversionDevice"),
    ("IfcEvaporator", "IfcEnergyConversionDevice"),
    ("IfcHeatExchanger", "IfcEnergyConversionDevice"),
    ("IfcHumidifier", "IfcEnergyConversionDevice"),
    ("IfcMotorConnection", "IfcEnergyConversionDevice"),
    ("IfcSolarDevice", "IfcEnergyConversionDevice"),
    ("IfcTransformer", "IfcEnergyConversionDevice"),
    ("IfcTubeBundle", "IfcEnergyConversionDevice"),
    ("IfcUnitaryEquipment", "IfcEnergyConversionDevice"),
    ("IfcAirTerminalBox", "IfcFlowController"),
    ("IfcDamper", "IfcFlowController"),
    ("IfcDistributionBoard", "IfcFlowController"),
    ("IfcElectricDistributionBoard", "IfcFlowController"),
    ("IfcElectricDistributionPoint", "IfcFlowController"),
    ("IfcElectricTimeControl", "IfcFlowController"),
    ("IfcFlowMeter", "IfcFlowController"),
    ("IfcProtectiveDevice", "IfcFlowController"),
    ("IfcSwitchingDevice", "IfcFlowController"),
    ("IfcValve", "IfcFlowController"),
    ("IfcCableCarrierFitting", "IfcFlowFitting"),
    ("IfcCableFitting", "IfcFlowFitting"),
    ("IfcDuctFitting", "IfcFlowFitting"),
    ("IfcJunctionBox", "IfcFlowFitting"),
    ("IfcPipeFitting", "IfcFlowFitting"),
    ("IfcCompressor", "IfcFlowMovingDevice"),
    ("IfcFan", "IfcFlowMovingDevice"),
    ("IfcPump", "IfcFlowMovingDevice"),
    ("IfcCableCarrierSegment", "IfcFlowSegment"),
    ("IfcCableSegment", "IfcFlowSegment"),
    ("IfcConveyorSegment", "IfcFlowSegment"),
    ("IfcDuctSegment", "IfcFlowSegment"),
    ("IfcPipeSegment", "IfcFlowSegment"),
    ("IfcElectricFlowStorageDevice", "IfcFlowStorageDevice"),
    ("IfcTank", "IfcFlowStorageDevice"),
    ("IfcAirTerminal", "IfcFlowTerminal"),
    ("IfcAudioVisualAppliance", "IfcFlowTerminal"),
    ("IfcCommunicationsAppliance", "IfcFlowTerminal"),
    ("IfcElectricAppliance", "IfcFlowTerminal"),
    ("IfcFireSuppressionTerminal", "IfcFlowTerminal"),
    ("IfcLamp", "IfcFlowTerminal"),
    ("IfcLightFixture", "IfcFlowTerminal"),
    ("IfcLiquidTerminal", "IfcFlowTerminal"),
    ("IfcMedicalDevice", "IfcFlowTerminal"),
    ("IfcMobileTelecommunicationsAppliance", "IfcFlowTerminal"),
    ("IfcOutlet", "IfcFlowTerminal"),
    ("IfcSanitaryTerminal", "IfcFlowTerminal"),
    ("IfcSignal", "IfcFlowTerminal"),
    ("IfcSpaceHeater", "IfcFlowTerminal"),
    ("IfcStackTerminal", "IfcFlowTerminal"),
    ("IfcWasteTerminal", "IfcFlowTerminal"),
    ("IfcDuctSilencer", "IfcFlowTreatmentDevice"),
    ("IfcElectricFlowTreatmentDevice", "IfcFlowTreatmentDevice"),
    ("IfcFilter", "IfcFlowTreatmentDevice"),
    ("IfcInterceptor", "IfcFlowTreatmentDevice"),
    // Type objects; the rest follow their classes
    ("IfcTypeProcess", "IfcTypeObject"),
    ("IfcTypeProduct", "IfcTypeObject"),
    ("IfcTypeResource", "IfcTypeObject"),
    ("IfcDoorStyle", "IfcTypeProduct"),
    ("IfcWindowStyle", "IfcTypeProduct"),
    ("IfcElectricHeaterType", "IfcFlowTerminalType"),
    ("IfcGasTerminalType", "IfcFlowTerminalType"),
    // Property definitions
    ("IfcPropertySetDefinition", "IfcPropertyDefinition"),
    ("IfcPropertyTemplateDefinition", "IfcPropertyDefinition"),
    ("IfcPropertySet", "IfcPropertySetDefinition"),
    ("IfcQuantitySet", "IfcPropertySetDefinition"),
    ("IfcPreDefinedPropertySet", "IfcPropertySetDefinition"),
    ("IfcElementQuantity", "IfcQuantitySet"),
    ("IfcDoorLiningProperties", "IfcPreDefinedPropertySet"),
    ("IfcDoorPanelProperties", "IfcPreDefinedPropertySet"),
    ("IfcPermeableCoveringProperties", "IfcPreDefinedPropertySet"),
    ("IfcReinforcementDefinitionProperties", "IfcPreDefinedPropertySet"),
    ("IfcWindowLiningProperties", "IfcPreDefinedPropertySet"),
    ("IfcWindowPanelProperties", "IfcPreDefinedPropertySet"),
    ("IfcEnergyProperties", "IfcPropertySetDefinition"),
    ("IfcElectricalBaseProperties", "IfcEnergyProperties"),
    ("IfcFluidFlowProperties", "IfcPropertySetDefinition"),
    ("IfcServiceLifeFactor", "IfcPropertySetDefinition"),
    ("IfcSoundProperties", "IfcPropertySetDefinition"),
    ("IfcSoundValue", "IfcPropertySetDefinition"),
    ("IfcSpaceThermalLoadProperties", "IfcPropertySetDefinition"),
    ("IfcPropertySetTemplate", "IfcPropertyTemplateDefinition"),
    ("IfcPropertyTemplate", "IfcPropertyTemplateDefinition"),
    ("IfcComplexPropertyTemplate", "IfcPropertyTemplate"),
    ("IfcSimplePropertyTemplate", "IfcPropertyTemplate"),
    // Relationships
    ("IfcRelAssigns", "IfcRelationship"),
    ("IfcRelAssociates", "IfcRelationship"),
    ("IfcRelConnects", "IfcRelationship"),
    ("IfcRelDeclares", "IfcRelationship"),
    ("IfcRelDecomposes", "IfcRelationship"),
    ("IfcRelDefines", "IfcRelationship"),
    ("IfcRelAssignsToActor", "IfcRelAssigns"),
    ("IfcRelOccupiesSpaces", "IfcRelAssignsToActor"),
    ("IfcRelAssignsToControl", "IfcRelAssigns"),
    ("IfcRelAssignsTasks", "IfcRelAssignsToControl"),
    ("IfcRelAssignsToProjectOrder", "IfcRelAssignsToControl"),
    ("IfcRelSchedulesCostItems", "IfcRelAssignsToControl"),
    ("IfcRelAssignsToGroup", "IfcRelAssigns"),
    ("IfcRelAssignsToGroupByFactor", "IfcRelAssignsToGroup"),
    ("IfcRelAssignsToProcess", "IfcRelAssigns"),
    ("IfcRelAssignsToProduct", "IfcRelAssigns"),
    ("IfcRelAssignsToResource", "IfcRelAssigns"),
    ("IfcRelAssociatesAppliedValue", "IfcRelAssociates"),
    ("IfcRelAssociatesApproval", "IfcRelAssociates"),
    ("IfcRelAssociatesClassification", "IfcRelAssociates"),
    ("IfcRelAssociatesConstraint", "IfcRelAssociates"),
    ("IfcRelAssociatesDocument", "IfcRelAssociates"),
    ("IfcRelAssociatesLibrary", "IfcRelAssociates"),
    ("IfcRelAssociatesMaterial", "IfcRelAssociates"),
    ("IfcRelAssociatesProfileDef", "IfcRelAssociates"),
    ("IfcRelAssociatesProfileProperties", "IfcRelAssociates"),
    ("IfcRelAdheresToElement", "IfcRelConnects"),
    ("IfcRelConnectsElements", "IfcRelConnects"),
    ("IfcRelConnectsPathElements", "IfcRelConnectsElements"),
    ("IfcRelConnectsWithRealizingElements", "IfcRelConnectsElements"),
    ("IfcRelConnectsPortToElement", "IfcRelConnects"),
    ("IfcRelConnectsPorts", "IfcRelConnects"),
    ("IfcRelConnectsStructuralActivity", "IfcRelConnects"),
    ("IfcRelConnectsStructuralElement", "IfcRelConnects"),
    ("IfcRelConnectsStructuralMember", "IfcRelConnects"),
    ("IfcRelConnectsWithEccentricity", "IfcRelConnectsStructuralMember"),
    ("IfcRelContainedInSpatialStructure", "IfcRelConnects"),
    ("IfcRelCoversBldgElements", "IfcRelConnects"),
    ("IfcRelCoversSpaces", "IfcRelConnects"),
    ("IfcRelFillsElement", "IfcRelConnects"),
    ("IfcRelFlowControlElements", "IfcRelConnects"),
    ("IfcRelInteractionRequirements", "IfcRelConnects"),
    ("IfcRelInterferesElements", "IfcRelConnects"),
    ("IfcRelPositions", "IfcRelConnects"),
    ("IfcRelReferencedInSpatialStructure", "IfcRelConnects"),
    ("IfcRelSequence", "IfcRelConnects"),
    ("IfcRelServicesBuildings", "IfcRelConnects"),
    ("IfcRelSpaceBoundary", "IfcRelConnects"),
    ("IfcRelSpaceBoundary1stLevel", "IfcRelSpaceBoundary"),
    ("IfcRelSpaceBoundary2ndLevel", "IfcRelSpaceBoundary1stLevel"),
    ("IfcRelAggregates", "IfcRelDecomposes"),
    ("IfcRelNests", "IfcRelDecomposes"),
    ("IfcRelVoidsElement", "IfcRelDecomposes"),
    ("IfcRelProjectsElement", "IfcRelDecomposes"),
    ("IfcRelDefinesByObject", "IfcRelDefines"),
    ("IfcRelDefinesByProperties", "IfcRelDefines"),
    ("IfcRelDefinesByTemplate", "IfcRelDefines"),
    ("IfcRelDefinesByType", "IfcRelDefines"),
    ("IfcRelOverridesProperties", "IfcRelDefinesByProperties"),
    // Properties
    ("IfcProperty", "IfcPropertyAbstraction"),
    ("IfcSimpleProperty", "IfcProperty"),
    ("IfcComplexProperty", "IfcProperty"),
    ("IfcPropertySingleValue", "IfcSimpleProperty"),
    ("IfcPropertyEnumeratedValue", "IfcSimpleProperty"),
    ("IfcPropertyBoundedValue", "IfcSimpleProperty"),
    ("IfcPropertyListValue", "IfcSimpleProperty"),
    ("IfcPropertyReferenceValue", "IfcSimpleProperty"),
    ("IfcPropertyTableValue", "IfcSimpleProperty"),
];

/// Supertype changes in IFC2X3 relative to the shared table.
const IFC2X3_OVERRIDES: &[(&str, &str)] = &[
    ("IfcProject", "IfcObject"),
    ("IfcSpatialStructureElement", "IfcProduct"),
    ("IfcGrid", "IfcProduct"),
    ("IfcZone", "IfcGroup"),
    ("IfcBuildingElementPart", "IfcBuildingElementComponent"),
    ("IfcReinforcingElement", "IfcBuildingElementComponent"),
    ("IfcMechanicalFastener", "IfcFastener"),
    ("IfcStructuralLinearAction", "IfcStructuralAction"),
    ("IfcStructuralPlanarAction", "IfcStructuralAction"),
    ("IfcElementQuantity", "IfcPropertySetDefinition"),
    ("IfcDoorLiningProperties", "IfcPropertySetDefinition"),
    ("IfcDoorPanelProperties", "IfcPropertySetDefinition"),
    ("IfcPermeableCoveringProperties", "IfcPropertySetDefinition"),
    ("IfcReinforcementDefinitionProperties", "IfcPropertySetDefinition"),
    ("IfcWindowLiningProperties", "IfcPropertySetDefinition"),
    ("IfcWindowPanelProperties", "IfcPropertySetDefinition"),
    ("IfcRelVoidsElement", "IfcRelConnects"),
    ("IfcRelProjectsElement", "IfcRelConnects"),
    ("IfcSpatialStructureElementType", "IfcElementType"),
];

/// Supertype changes in IFC4X3 relative to the shared table, applied after
/// the IfcBuildingElement family moves under IfcBuiltElement.
const IFC4X3_OVERRIDES: &[(&str, &str)] = &[
    ("IfcBuilding", "IfcFacility"),
    ("IfcPile", "IfcDeepFoundation"),
    ("IfcTransportElement", "IfcTransportationDevice"),
];

/// Classes whose subtypes get `{class}Type` type objects, with the type
/// object of the class itself.
const TYPE_ROOTS: &[(&str, &str)] = &[
    ("IfcProduct", "IfcTypeProduct"),
    ("IfcProcess", "IfcTypeProcess"),
    ("IfcResource", "IfcTypeResource"),
];

/// Explicit attributes declared directly on a type, in STEP order.
/// Positions of inherited attributes come first.
const ATTRIBUTES: &[(&str, &[&str])] = &[
    ("IfcRoot", &["GlobalId", "OwnerHistory", "Name", "Description"]),
    ("IfcObject", &["ObjectType"]),
    ("IfcProduct", &["ObjectPlacement", "Representation"]),
    ("IfcElement", &["Tag"]),
    ("IfcContext", &["ObjectType", "LongName", "Phase", "RepresentationContexts", "UnitsInContext"]),
    ("IfcRelDefinesByProperties", &["RelatedObjects", "RelatingPropertyDefinition"]),
    ("IfcRelOverridesProperties", &["OverridingProperties"]),
    ("IfcRelDefinesByType", &["RelatedObjects", "RelatingType"]),
    ("IfcRelDefinesByObject", &["RelatedObjects", "RelatingObject"]),
    ("IfcRelDefinesByTemplate", &["RelatedPropertySets", "RelatingTemplate"]),
    ("IfcPropertySet", &["HasProperties"]),
    ("IfcElementQuantity", &["MethodOfMeasurement", "Quantities"]),
    ("IfcProperty", &["Name", "Description"]),
    ("IfcPropertySingleValue", &["NominalValue", "Unit"]),
    ("IfcPropertyEnumeratedValue", &["EnumerationValues", "EnumerationReference"]),
    ("IfcPropertyBoundedValue", &["UpperBoundValue", "LowerBoundValue", "Unit"]),
    ("IfcPropertyListValue", &["ListValues", "Unit"]),
    ("IfcComplexProperty", &["UsageName", "HasProperties"]),
];

/// IFC2X3 declares IfcProject's extra attributes on IfcProject itself.
const IFC2X3_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("IfcContext", &[]),
    ("IfcProject", &["LongName", "Phase", "RepresentationContexts", "UnitsInContext"]),
];

/// Inheritance and attribute tables for one schema release
#[derive(Debug)]
pub struct IfcSchema {
    version: SchemaVersion,
    /// UPPERCASE name -> canonical name
    names: FxHashMap<String, &'static str>,
    /// canonical name -> direct supertype
    parents: FxHashMap<&'static str, &'static str>,
    /// canonical name -> explicit attributes declared on that type
    attributes: FxHashMap<&'static str, &'static [&'static str]>,
}

impl IfcSchema {
    /// Shared schema for a release, built on first use
    pub fn get(version: SchemaVersion) -> &'static IfcSchema {
        static IFC2X3: OnceLock<IfcSchema> = OnceLock::new();
        static IFC4: OnceLock<IfcSchema> = OnceLock::new();
        static IFC4X3: OnceLock<IfcSchema> = OnceLock::new();

        let cell = match version {
            SchemaVersion::Ifc2x3 => &IFC2X3,
            SchemaVersion::Ifc4 => &IFC4,
            SchemaVersion::Ifc4x3 => &IFC4X3,
        };
        cell.get_or_init(|| Self::build(version))
    }

    fn build(version: SchemaVersion) -> Self {
        let mut parents: FxHashMap<&'static str, &'static str> =
            HIERARCHY.iter().copied().collect();
        let mut attributes: FxHashMap<&'static str, &'static [&'static str]> =
            ATTRIBUTES.iter().copied().collect();

        match version {
            SchemaVersion::Ifc2x3 => {
                parents.extend(IFC2X3_OVERRIDES.iter().copied());
                attributes.extend(IFC2X3_ATTRIBUTES.iter().copied());
            }
            SchemaVersion::Ifc4x3 => {
                for parent in parents.values_mut() {
                    if *parent == "IfcBuildingElement" {
                        *parent = "IfcBuiltElement";
                    }
                }
                parents.extend(IFC4X3_OVERRIDES.iter().copied());
            }
            SchemaVersion::Ifc4 => {}
        }
        derive_type_objects(&mut parents);

        let mut names = FxHashMap::default();
        for (child, parent) in parents.iter() {
            names.insert(child.to_ascii_uppercase(), *child);
            names.insert(parent.to_ascii_uppercase(), *parent);
        }

        Self {
            version,
            names,
            parents,
            attributes,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Canonical spelling of a type name, matched case-insensitively
    pub fn canonical_name(&self, type_name: &str) -> Option<&'static str> {
        if let Some(name) = self.names.get(type_name) {
            return Some(*name);
        }
        self.names.get(&type_name.to_ascii_uppercase()).copied()
    }

    /// Direct supertype of a type
    pub fn parent_of(&self, type_name: &str) -> Option<&'static str> {
        let name = self.canonical_name(type_name)?;
        self.parents.get(name).copied()
    }

    /// The type itself followed by all of its supertypes, most specific first
    pub fn supertypes(&self, type_name: &str) -> Vec<&'static str> {
        let mut chain = Vec::new();
        let mut current = self.canonical_name(type_name);
        while let Some(name) = current {
            chain.push(name);
            current = self.parents.get(name).copied();
        }
        chain
    }

    /// Whether `type_name` is `ancestor` or one of its subtypes
    pub fn is_subtype_of(&self, type_name: &str, ancestor: &str) -> bool {
        let Some(ancestor) = self.canonical_name(ancestor) else {
            return false;
        };
        self.supertypes(type_name).contains(&ancestor)
    }

    /// Position of a named explicit attribute, counting inherited attributes
    pub fn attribute_index(&self, type_name: &str, attribute: &str) -> Option<usize> {
        let chain = self.supertypes(type_name);
        let mut offset = 0;
        for name in chain.iter().rev() {
            let declared = self.attributes.get(name).copied().unwrap_or(&[]);
            if let Some(pos) = declared.iter().position(|a| a.eq_ignore_ascii_case(attribute)) {
                return Some(offset + pos);
            }
            offset += declared.len();
        }
        None
    }
}

/// First class of [`TYPE_ROOTS`] above `class`, if any
fn type_root(
    parents: &FxHashMap<&'static str, &'static str>,
    class: &str,
) -> Option<&'static str> {
    let mut current = parents.get(class).copied();
    while let Some(name) = current {
        if TYPE_ROOTS.iter().any(|(root, _)| *root == name) {
            return Some(name);
        }
        current = parents.get(name).copied();
    }
    None
}

/// Add a `{class}Type` entry, parented like its class, for every product,
/// process and resource class. Listed entries win.
///
/// Each schema is built once per process, so the derived names are leaked
/// to share the `'static` tables.
fn derive_type_objects(parents: &mut FxHashMap<&'static str, &'static str>) {
    let classes: Vec<(&'static str, &'static str, &'static str)> = parents
        .iter()
        .filter_map(|(class, parent)| Some((*class, *parent, type_root(parents, class)?)))
        .collect();

    let type_names: FxHashMap<&'static str, &'static str> = classes
        .iter()
        .map(|(class, _, _)| {
            let name: &'static str = Box::leak(format!("{class}Type").into_boxed_str());
            (*class, name)
        })
        .collect();

    for (class, parent, root) in classes {
        let parent_type = if parent == root {
            TYPE_ROOTS
                .iter()
                .find(|(root_class, _)| *root_class == root)
                .map(|(_, root_type)| *root_type)
        } else {
            type_names.get(parent).copied()
        };
        if let (Some(name), Some(parent_type)) = (type_names.get(class), parent_type) {
            parents.entry(*name).or_insert(parent_type);
        }
    }
}
