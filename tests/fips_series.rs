use bls_rs::fips::parse_fips_table;
use bls_rs::series::{build_series_halves, series_id};

fn page(rows: usize) -> String {
    let mut html = String::from(
        "<html><body><table><tr><th>Menu</th></tr></table>\
         <table><tr><th>Name</th><th>Postal Code</th><th>FIPS</th></tr>",
    );
    for i in 1..=rows {
        html.push_str(&format!(
            "<tr><td>State {i}</td><td>S{i}</td><td>{i}.0</td></tr>"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

#[test]
fn keeps_only_the_first_fifty_rows() {
    let states = parse_fips_table(&page(56)).unwrap();
    assert_eq!(states.len(), 50);
    assert_eq!(states[0].name, "State 1");
    assert_eq!(states[49].fips, 50);
}

#[test]
fn shorter_tables_are_kept_whole() {
    assert_eq!(parse_fips_table(&page(3)).unwrap().len(), 3);
}

#[test]
fn series_ids_from_scraped_table() {
    let states = parse_fips_table(&page(50)).unwrap();
    let (a, b) = build_series_halves(&states, "LAU", "03");
    assert_eq!(a.len(), 25);
    assert_eq!(b.len(), 25);
    assert_eq!(a.get("LAU0503"), Some("State 5"));
    assert_eq!(b.get("LAU3603"), Some("State 36"));
    assert_eq!(series_id(5, "LAU", "03"), "LAU0503");
    assert_eq!(series_id(36, "LAU", "03"), "LAU3603");
}

#[test]
fn odd_sized_table_puts_extra_entry_in_second_half() {
    let states = parse_fips_table(&page(7)).unwrap();
    let (a, b) = build_series_halves(&states, "P", "S");
    assert_eq!((a.len(), b.len()), (3, 4));
    assert_eq!(a.ids().last(), Some("P03S"));
    assert_eq!(b.ids().next(), Some("P04S"));
}
