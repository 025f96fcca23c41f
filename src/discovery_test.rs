use crate::{
    discovery::{find_touch_panel, normalize_name},
    procfs,
};

#[test]
fn test_normalize_name() {
    assert_eq!(normalize_name("Driving Force GT"), "drivingforcegt");
    assert_eq!(normalize_name(" G27 Racing Wheel "), "g27racingwheel");
    assert_eq!(normalize_name(""), "");
}

#[test]
fn test_find_touch_panel() {
    let content = "I: Bus=0003 Vendor=046d Product=c29a Version=0111\n\
                   N: Name=\"Driving Force GT\"\n\
                   H: Handlers=event2 js0\n\
                   \n\
                   I: Bus=0003 Vendor=0eef Product=0001 Version=0100\n\
                   N: Name=\"eGalax Inc. USB TouchController\"\n\
                   H: Handlers=mouse1 event7\n";
    let devices = procfs::device::parse(content);
    assert_eq!(
        find_touch_panel(&devices).as_deref(),
        Some("/dev/input/event7")
    );
    assert_eq!(find_touch_panel(&devices[..1]), None);
}
