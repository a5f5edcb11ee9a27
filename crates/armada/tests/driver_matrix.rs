use armada::cli::{Driver, DriverConfig, Mode};

fn run(mode: Mode, script: &str) -> String {
    let config = DriverConfig {
        mode,
        ..DriverConfig::default()
    };
    let mut driver = Driver::new(&config);
    let mut out = Vec::new();
    driver.run(script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn ocean_session() {
    let script = "\
add_ship 1 5
add_ship 2 1
add_pirate 10 1 50
add_pirate 11 1 80
get_richest_pirate 1
update_pirate_treasure 10 40
get_treasure 10
get_richest_pirate 1
add_pirate 20 2 3
ships_battle 1 2
get_treasure 10
get_treasure 20
treason 1 2
get_richest_pirate 2
remove_ship 2
remove_pirate 10
remove_pirate 20
remove_ship 2
get_cannons 2
add_ship 0 1
";
    let expected = "\
add_ship: SUCCESS
add_ship: SUCCESS
add_pirate: SUCCESS
add_pirate: SUCCESS
get_richest_pirate: SUCCESS, 11
update_pirate_treasure: SUCCESS
get_treasure: SUCCESS, 90
get_richest_pirate: SUCCESS, 10
add_pirate: SUCCESS
ships_battle: SUCCESS
get_treasure: SUCCESS, 91
get_treasure: SUCCESS, 1
treason: SUCCESS
get_richest_pirate: SUCCESS, 10
remove_ship: FAILURE
remove_pirate: SUCCESS
remove_pirate: SUCCESS
remove_ship: SUCCESS
get_cannons: FAILURE
add_ship: INVALID_INPUT
";
    assert_eq!(run(Mode::Ocean, script), expected);
}

#[test]
fn fleets_session() {
    let script = "\
add_fleet 1
add_fleet 2
add_pirate 100 1
add_pirate 200 2
unite_fleets 1 2
num_ships_for_fleet 1
num_ships_for_fleet 2
add_pirate 300 2
pirate_argument 100 200
get_pirate_money 100
get_pirate_money 200
pay_pirate 200 0
pay_pirate 200 10
get_pirate_money 200
pirate_argument 100 100
";
    let expected = "\
add_fleet: SUCCESS
add_fleet: SUCCESS
add_pirate: SUCCESS
add_pirate: SUCCESS
unite_fleets: SUCCESS
num_ships_for_fleet: SUCCESS, 2
num_ships_for_fleet: FAILURE
add_pirate: FAILURE
pirate_argument: SUCCESS
get_pirate_money: SUCCESS, 1
get_pirate_money: SUCCESS, -1
pay_pirate: INVALID_INPUT
pay_pirate: SUCCESS
get_pirate_money: SUCCESS, 9
pirate_argument: INVALID_INPUT
";
    assert_eq!(run(Mode::Fleets, script), expected);
}

#[test]
fn commands_of_the_other_mode_are_rejected() {
    assert_eq!(run(Mode::Fleets, "add_ship 1 2\nadd_fleet 1\n"), "add_fleet: SUCCESS\n");
    assert_eq!(run(Mode::Ocean, "add_fleet 1\nadd_ship 1 2\n"), "add_ship: SUCCESS\n");
}
