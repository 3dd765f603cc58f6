// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device type table.

use super::type_name::type_table;

type_table! {
    /// The kind of device announced by a client.
    ///
    /// Each entry carries its canonical name and the short identifier code
    /// used by the accessory protocol the table is modelled on.
    pub enum DeviceType {
        AccessoryInformation => ("accessoryInformation", "3E"),
        AirPurifier => ("airPurifier", "BB"),
        AirQualitySensor => ("airQualitySensor", "8D"),
        BatteryService => ("batteryService", "96"),
        BridgeConfiguration => ("bridgeConfiguration", "A1"),
        BridgingState => ("bridgingState", "62"),
        CameraControl => ("cameraControl", "111"),
        CameraRtpStreamManagement => ("cameraRTPStreamManagement", "110"),
        CarbonDioxideSensor => ("carbonDioxideSensor", "97"),
        CarbonMonoxideSensor => ("carbonMonoxideSensor", "7F"),
        ContactSensor => ("contactSensor", "80"),
        Door => ("door", "81"),
        Doorbell => ("doorbell", "121"),
        Fan => ("fan", "40"),
        FanV2 => ("fanV2", "B7"),
        FilterMaintenance => ("filterMaintenance", "BA"),
        GarageDoorOpener => ("garageDoorOpener", "41"),
        HeaterCooler => ("heaterCooler", "BC"),
        HumidifierDehumidifier => ("humidifierDehumidifier", "BD"),
        HumiditySensor => ("humiditySensor", "82"),
        LeakSensor => ("leakSensor", "83"),
        LightSensor => ("lightSensor", "84"),
        Lightbulb => ("lightbulb", "43"),
        LockManagement => ("lockManagement", "44"),
        LockMechanism => ("lockMechanism", "45"),
        Microphone => ("microphone", "112"),
        MotionSensor => ("motionSensor", "85"),
        OccupancySensor => ("occupancySensor", "86"),
        Outlet => ("outlet", "47"),
        SecuritySystem => ("securitySystem", "7E"),
        Slat => ("slat", "B9"),
        SmokeSensor => ("smokeSensor", "87"),
        Speaker => ("speaker", "113"),
        StatefulProgrammableSwitch => ("statefulProgrammableSwitch", "88"),
        StatelessProgrammableSwitch => ("statelessProgrammableSwitch", "89"),
        Switch => ("switch", "49"),
        TemperatureSensor => ("temperatureSensor", "8A"),
        Thermostat => ("thermostat", "4A"),
        TimeInformation => ("timeInformation", "99"),
        TunneledBtleAccessoryService => ("tunneledBTLEAccessoryService", "56"),
        Window => ("window", "8B"),
        WindowCovering => ("windowCovering", "8C"),
    }
}
