use crate::procfs::device::parse;

const INPUT_DEVICES: &str = r#"I: Bus=0019 Vendor=0000 Product=0001 Version=0000
N: Name="Power Button"
P: Phys=PNP0C0C/button/input0
S: Sysfs=/devices/LNXSYSTM:00/LNXPWRBN:00/input/input0
U: Uniq=
H: Handlers=kbd event0
B: PROP=0
B: EV=3

I: Bus=0003 Vendor=0eef Product=0001 Version=0100
N: Name="eGalax Inc. USB TouchController"
P: Phys=usb-0000:00:14.0-2/input0
S: Sysfs=/devices/pci0000:00/0000:00:14.0/usb1/1-2/1-2:1.0/0003:0EEF:0001.0001/input/input7
U: Uniq=
H: Handlers=mouse1 event7 js2
B: PROP=0
B: EV=b
"#;

#[test]
fn test_parse_input_devices() {
    let devices = parse(INPUT_DEVICES);
    assert_eq!(devices.len(), 2);

    let button = &devices[0];
    assert_eq!(button.name, "Power Button");
    assert_eq!(button.id.bus_type, "0019");
    assert_eq!(button.phys_path, "PNP0C0C/button/input0");
    assert_eq!(button.event_handler(), Some("event0"));

    let panel = &devices[1];
    assert_eq!(panel.name, "eGalax Inc. USB TouchController");
    assert_eq!(panel.id.vendor, "0eef");
    assert_eq!(panel.id.product, "0001");
    assert_eq!(panel.handlers, vec!["mouse1", "event7", "js2"]);
    assert_eq!(panel.event_handler(), Some("event7"));
}

#[test]
fn test_parse_without_handlers() {
    let devices = parse("I: Bus=0003 Vendor=0001 Product=0002 Version=0003\nN: Name=\"Bare\"\n");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].event_handler(), None);
}
