// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature type table.

use super::type_name::type_table;

type_table! {
    /// A capability a device exposes, such as `on` or `brightness`.
    ///
    /// Each entry carries its canonical name and the short identifier code
    /// used by the accessory protocol the table is modelled on.
    pub enum FeatureType {
        AccessoryFlags => ("accessoryFlags", "A6"),
        AccessoryIdentifier => ("accessoryIdentifier", "57"),
        Active => ("active", "B0"),
        AdministratorOnlyAccess => ("administratorOnlyAccess", "1"),
        AirParticulateDensity => ("airParticulateDensity", "64"),
        AirParticulateSize => ("airParticulateSize", "65"),
        AirQuality => ("airQuality", "95"),
        AppMatchingIdentifier => ("appMatchingIdentifier", "A4"),
        AudioFeedback => ("audioFeedback", "5"),
        BatteryLevel => ("batteryLevel", "68"),
        Brightness => ("brightness", "8"),
        CarbonDioxideDetected => ("carbonDioxideDetected", "92"),
        CarbonDioxideLevel => ("carbonDioxideLevel", "93"),
        CarbonDioxidePeakLevel => ("carbonDioxidePeakLevel", "94"),
        CarbonMonoxideDetected => ("carbonMonoxideDetected", "69"),
        CarbonMonoxideLevel => ("carbonMonoxideLevel", "90"),
        CarbonMonoxidePeakLevel => ("carbonMonoxidePeakLevel", "91"),
        Category => ("category", "A3"),
        ChargingState => ("chargingState", "8F"),
        ColorTemperature => ("colorTemperature", "CE"),
        ConfigureBridgedAccessory => ("configureBridgedAccessory", "A0"),
        ConfigureBridgedAccessoryStatus => ("configureBridgedAccessoryStatus", "9D"),
        ContactSensorState => ("contactSensorState", "6A"),
        CoolingThresholdTemperature => ("coolingThresholdTemperature", "D"),
        CurrentAirPurifierState => ("currentAirPurifierState", "A9"),
        CurrentAmbientLightLevel => ("currentAmbientLightLevel", "6B"),
        CurrentDoorState => ("currentDoorState", "E"),
        CurrentFanState => ("currentFanState", "AF"),
        CurrentHeaterCoolerState => ("currentHeaterCoolerState", "B1"),
        CurrentHeatingCoolingState => ("currentHeatingCoolingState", "F"),
        CurrentHorizontalTiltAngle => ("currentHorizontalTiltAngle", "6C"),
        CurrentHumidifierDehumidifierState => ("currentHumidifierDehumidifierState", "B3"),
        CurrentPosition => ("currentPosition", "6D"),
        CurrentRelativeHumidity => ("currentRelativeHumidity", "10"),
        CurrentSlatState => ("currentSlatState", "AA"),
        CurrentTemperature => ("currentTemperature", "11"),
        CurrentTiltAngle => ("currentTiltAngle", "C1"),
        CurrentTime => ("currentTime", "9B"),
        CurrentVerticalTiltAngle => ("currentVerticalTiltAngle", "6E"),
        DayOfTheWeek => ("dayOfTheWeek", "98"),
        DigitalZoom => ("digitalZoom", "11D"),
        DiscoverBridgedAccessories => ("discoverBridgedAccessories", "9E"),
        DiscoveredBridgedAccessories => ("discoveredBridgedAccessories", "9F"),
        FilterChangeIndication => ("filterChangeIndication", "AC"),
        FilterLifeLevel => ("filterLifeLevel", "AB"),
        FirmwareRevision => ("firmwareRevision", "52"),
        HardwareRevision => ("hardwareRevision", "53"),
        HeatingThresholdTemperature => ("heatingThresholdTemperature", "12"),
        HoldPosition => ("holdPosition", "6F"),
        Hue => ("hue", "13"),
        Identify => ("identify", "14"),
        ImageMirroring => ("imageMirroring", "11F"),
        ImageRotation => ("imageRotation", "11E"),
        LeakDetected => ("leakDetected", "70"),
        LinkQuality => ("linkQuality", "9C"),
        LockControlPoint => ("lockControlPoint", "19"),
        LockCurrentState => ("lockCurrentState", "1D"),
        LockLastKnownAction => ("lockLastKnownAction", "1C"),
        LockManagementAutoSecurityTimeout => ("lockManagementAutoSecurityTimeout", "1A"),
        LockPhysicalControls => ("lockPhysicalControls", "A7"),
        LockTargetState => ("lockTargetState", "1E"),
        Logs => ("logs", "1F"),
        Manufacturer => ("manufacturer", "20"),
        Model => ("model", "21"),
        MotionDetected => ("motionDetected", "22"),
        Mute => ("mute", "11A"),
        Name => ("name", "23"),
        NightVision => ("nightVision", "11B"),
        NitrogenDioxideDensity => ("nitrogenDioxideDensity", "C4"),
        ObstructionDetected => ("obstructionDetected", "24"),
        OccupancyDetected => ("occupancyDetected", "71"),
        On => ("on", "25"),
        OpticalZoom => ("opticalZoom", "11C"),
        OutletInUse => ("outletInUse", "26"),
        OzoneDensity => ("ozoneDensity", "C3"),
        PairSetup => ("pairSetup", "4C"),
        PairVerify => ("pairVerify", "4E"),
        PairingFeatures => ("pairingFeatures", "4F"),
        PairingPairings => ("pairingPairings", "50"),
        Pm10Density => ("pM10Density", "C7"),
        Pm25Density => ("pM2_5Density", "C6"),
        PositionState => ("positionState", "72"),
        ProgrammableSwitchEvent => ("programmableSwitchEvent", "73"),
        ProgrammableSwitchOutputState => ("programmableSwitchOutputState", "74"),
        Reachable => ("reachable", "63"),
        RelativeHumidityDehumidifierThreshold => ("relativeHumidityDehumidifierThreshold", "C9"),
        RelativeHumidityHumidifierThreshold => ("relativeHumidityHumidifierThreshold", "CA"),
        ResetFilterIndication => ("resetFilterIndication", "AD"),
        RotationDirection => ("rotationDirection", "28"),
        RotationSpeed => ("rotationSpeed", "29"),
        Saturation => ("saturation", "2F"),
        SecuritySystemAlarmType => ("securitySystemAlarmType", "8E"),
        SecuritySystemCurrentState => ("securitySystemCurrentState", "66"),
        SecuritySystemTargetState => ("securitySystemTargetState", "67"),
        SelectedStreamConfiguration => ("selectedStreamConfiguration", "117"),
        SerialNumber => ("serialNumber", "30"),
        SetupEndpoints => ("setupEndpoints", "118"),
        SlatType => ("slatType", "C0"),
        SmokeDetected => ("smokeDetected", "76"),
        SoftwareRevision => ("softwareRevision", "54"),
        StatusActive => ("statusActive", "75"),
        StatusFault => ("statusFault", "77"),
        StatusJammed => ("statusJammed", "78"),
        StatusLowBattery => ("statusLowBattery", "79"),
        StatusTampered => ("statusTampered", "7A"),
        StreamingStatus => ("streamingStatus", "120"),
        SulphurDioxideDensity => ("sulphurDioxideDensity", "C5"),
        SupportedAudioStreamConfiguration => ("supportedAudioStreamConfiguration", "115"),
        SupportedRtpConfiguration => ("supportedRTPConfiguration", "116"),
        SupportedVideoStreamConfiguration => ("supportedVideoStreamConfiguration", "114"),
        SwingMode => ("swingMode", "B6"),
        TargetAirPurifierState => ("targetAirPurifierState", "A8"),
        TargetAirQuality => ("targetAirQuality", "AE"),
        TargetDoorState => ("targetDoorState", "32"),
        TargetFanState => ("targetFanState", "BF"),
        TargetHeaterCoolerState => ("targetHeaterCoolerState", "B2"),
        TargetHeatingCoolingState => ("targetHeatingCoolingState", "33"),
        TargetHorizontalTiltAngle => ("targetHorizontalTiltAngle", "7B"),
        TargetHumidifierDehumidifierState => ("targetHumidifierDehumidifierState", "B4"),
        TargetPosition => ("targetPosition", "7C"),
        TargetRelativeHumidity => ("targetRelativeHumidity", "34"),
        TargetSlatState => ("targetSlatState", "BE"),
        TargetTemperature => ("targetTemperature", "35"),
        TargetTiltAngle => ("targetTiltAngle", "C2"),
        TargetVerticalTiltAngle => ("targetVerticalTiltAngle", "7D"),
        TemperatureDisplayUnits => ("temperatureDisplayUnits", "36"),
        TimeUpdate => ("timeUpdate", "9A"),
        TunnelConnectionTimeout => ("tunnelConnectionTimeout", "61"),
        TunneledAccessoryAdvertising => ("tunneledAccessoryAdvertising", "60"),
        TunneledAccessoryConnected => ("tunneledAccessoryConnected", "59"),
        TunneledAccessoryStateNumber => ("tunneledAccessoryStateNumber", "58"),
        Version => ("version", "37"),
        VocDensity => ("vOCDensity", "C8"),
        Volume => ("volume", "119"),
        WaterLevel => ("waterLevel", "B5"),
    }
}
