use std::error::Error;

use crate::{
    config::KeyFile,
    switch::{
        compiler::{compile, parse_action},
        Action, CodeSlot, CompileError,
    },
};

const WHEEL_CONF: &str = r#"
[device]
name=GTForce
ictl=ico_dic-gtforce
type=1
ecu=2

[input]
1=Horn
1.event=1;0
1.code=1:Horn
1.fixed=shell=/bin/play-horn.sh
2=Gear
2.event=2;5
2.code=10:Up;11:Down
3=Cross
3.event=1;4
3.code=0x20;7:Menu;9:Extra
3.fixed=appid=org.example.menu:key=0x1c
4=horn
4.event=1;6
x=NotASwitch
x.event=1;7
5=Wiper
5.event=1
6=Lamp
6.event=1;8
6.code=3:Lamp;4:High
6.fixed=4:@:key=30
7=Mute
7.event=1;9
7.code=5:
"#;

#[test]
fn compile_device_info() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse(WHEEL_CONF)?;
    let table = compile(&file)?;

    assert_eq!(table.device.name, "GTForce");
    assert_eq!(table.device.controller, "ico_dic-gtforce");
    assert_eq!(table.device.device_type, 1);
    assert_eq!(table.device.ecu, 2);

    Ok(())
}

#[test]
fn compile_switches() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse(WHEEL_CONF)?;
    let table = compile(&file)?;

    // "horn" duplicates "Horn", "x" is not numeric, "Wiper" has an incomplete event
    let names: Vec<&str> = table.switches.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Horn", "Gear", "Cross", "Lamp", "Mute"]);

    let horn = table.find_by_name("HORN").ok_or("horn not found")?;
    assert_eq!(horn.input, 1);
    assert_eq!((horn.class, horn.index), (1, 0));
    assert_eq!(horn.codes.len(), 1);
    assert!(!horn.is_bipolar());
    assert_eq!(horn.codes[0].code, 1);
    assert_eq!(
        horn.codes[0].action,
        Action::Shell("/bin/play-horn.sh".to_string())
    );

    let gear = table.find_by_name("Gear").ok_or("gear not found")?;
    assert!(gear.is_bipolar());
    assert_eq!(gear.code(CodeSlot::First).map(|c| c.code), Some(10));
    assert_eq!(gear.code(CodeSlot::Second).map(|c| c.name.as_str()), Some("Down"));
    assert_eq!(gear.codes[0].action, Action::None);

    Ok(())
}

#[test]
fn compile_code_defaults() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse(WHEEL_CONF)?;
    let table = compile(&file)?;

    // Only two codes are kept and a bare action applies to both
    let cross = table.find_by_name("Cross").ok_or("cross not found")?;
    assert_eq!(cross.codes.len(), 2);
    assert_eq!(cross.codes[0].name, "Cross");
    assert_eq!(cross.codes[1].name, "Menu");
    let expected = Action::Forward {
        app_id: "org.example.menu".to_string(),
        keycode: 0x1c,
    };
    assert_eq!(cross.codes[0].action, expected);
    assert_eq!(cross.codes[1].action, expected);

    // Targeted action only binds the matching code
    let lamp = table.find_by_name("Lamp").ok_or("lamp not found")?;
    assert_eq!(lamp.codes[0].action, Action::None);
    assert_eq!(
        lamp.codes[1].action,
        Action::Forward {
            app_id: " ".to_string(),
            keycode: 30
        }
    );

    let mute = table.find_by_name("Mute").ok_or("mute not found")?;
    assert_eq!(mute.codes[0].code, 5);
    assert_eq!(mute.codes[0].name, "Mute");

    Ok(())
}

#[test]
fn compile_announced_switches() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse(WHEEL_CONF)?;
    let table = compile(&file)?;

    let announced: Vec<&str> = table.announced().map(|s| s.name.as_str()).collect();
    assert_eq!(announced, vec!["Gear", "Lamp", "Mute"]);

    Ok(())
}

#[test]
fn compile_without_switches() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse("[device]\nname=Empty\n")?;
    let result = compile(&file);
    assert!(matches!(result, Err(CompileError::NoSwitches)));

    Ok(())
}

#[test]
fn unknown_target_code_is_ignored() -> Result<(), Box<dyn Error>> {
    let file = KeyFile::parse("[input]\n1=Knob\n1.event=2;1\n1.code=1:A;2:B\n1.fixed=9:shell=true\n")?;
    let table = compile(&file)?;

    let knob = &table.switches[0];
    assert!(knob.codes.iter().all(|c| c.action == Action::None));

    Ok(())
}

#[test]
fn parse_actions() {
    assert_eq!(
        parse_action("SHELL=/usr/bin/run a b"),
        Action::Shell("/usr/bin/run a b".to_string())
    );
    assert_eq!(
        parse_action("appid=org.example.radio:key=115"),
        Action::Forward {
            app_id: "org.example.radio".to_string(),
            keycode: 115
        }
    );
    assert_eq!(
        parse_action("org.example.radio:0x73"),
        Action::Forward {
            app_id: "org.example.radio".to_string(),
            keycode: 0x73
        }
    );
    assert_eq!(
        parse_action("org.example.radio"),
        Action::Forward {
            app_id: "org.example.radio".to_string(),
            keycode: 0
        }
    );
    assert_eq!(
        parse_action(":key=12"),
        Action::Forward {
            app_id: " ".to_string(),
            keycode: 12
        }
    );
    assert_eq!(
        parse_action("@focus:key=12"),
        Action::Forward {
            app_id: " ".to_string(),
            keycode: 12
        }
    );
}
