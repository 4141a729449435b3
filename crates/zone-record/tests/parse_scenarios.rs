//! End-to-end parses of small zones against expected wire tuples.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use zone_record::{Cache, LogCategories, LogCategory, Options, Record, parse_string};
use zone_types::{ClassCode, TypeCode, ZoneError, ZoneResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rr {
    owner: Vec<u8>,
    rtype: u16,
    class: u16,
    ttl: u32,
    rdata: Vec<u8>,
}

fn parse_zone(text: &str, origin: &str, default_ttl: u32) -> ZoneResult<Vec<Rr>> {
    let options = Options::new(origin, default_ttl, ClassCode::IN);
    let mut cache = Cache::new(2);
    let mut out = Vec::new();
    let mut sink = |record: &Record<'_>| {
        out.push(Rr {
            owner: record.owner.as_wire().to_vec(),
            rtype: record.rtype.0,
            class: record.class.0,
            ttl: record.ttl,
            rdata: record.rdata.to_vec(),
        });
        // exercise slot cycling
        Ok((record.slot + 1) % 2)
    };
    parse_string(text.as_bytes(), options, &mut cache, &mut sink)?;
    Ok(out)
}

#[test]
fn absolute_owner_explicit_everything() {
    let rrs = parse_zone("example.com. 3600 IN A 192.0.2.1\n", "example.", 60).unwrap();
    assert_eq!(
        rrs,
        vec![Rr {
            owner: b"\x07example\x03com\x00".to_vec(),
            rtype: 1,
            class: 1,
            ttl: 3600,
            rdata: b"\xC0\x00\x02\x01".to_vec(),
        }]
    );
}

#[test]
fn at_sign_owner_inherits_default_ttl() {
    let rrs = parse_zone("@ IN AAAA ::1\n", "example.", 60).unwrap();
    assert_eq!(rrs.len(), 1);
    assert_eq!(rrs[0].owner, b"\x07example\x00");
    assert_eq!(rrs[0].rtype, 28);
    assert_eq!(rrs[0].ttl, 60);
    let mut rdata = vec![0u8; 16];
    rdata[15] = 1;
    assert_eq!(rrs[0].rdata, rdata);
}

#[test]
fn txt_quoted_vs_bare_strings() {
    let rrs = parse_zone("a TXT \"hello world\"\nb TXT hello world\n", "x.", 10).unwrap();
    assert_eq!(rrs.len(), 2);
    assert_eq!(rrs[0].rdata, b"\x0bhello world");
    assert_eq!(rrs[1].rdata, b"\x05hello\x05world");
    assert_eq!(rrs[0].owner, b"\x01a\x01x\x00");
    assert_eq!(rrs[1].owner, b"\x01b\x01x\x00");
}

#[test]
fn origin_directive_applies_to_relative_names() {
    let rrs = parse_zone("$ORIGIN z.\nh 10 IN MX 20 mail\n", "example.", 60).unwrap();
    assert_eq!(
        rrs,
        vec![Rr {
            owner: b"\x01h\x01z\x00".to_vec(),
            rtype: 15,
            class: 1,
            ttl: 10,
            rdata: b"\x00\x14\x04mail\x01z\x00".to_vec(),
        }]
    );
}

#[test]
fn generic_type_with_generic_rdata() {
    let rrs = parse_zone("x TYPE999 \\# 4 DEADBEEF\n", "z.", 60).unwrap();
    assert_eq!(rrs[0].rtype, 999);
    assert_eq!(rrs[0].rdata, b"\xDE\xAD\xBE\xEF");
}

#[test]
fn trailing_comment_and_empty_group() {
    let rrs = parse_zone("y A 192.0.2.1 ; trailing comment\n(\n)\n", "z.", 60).unwrap();
    assert_eq!(rrs.len(), 1);
    assert_eq!(rrs[0].rtype, 1);
}

#[test]
fn bad_ipv4_literal_is_semantic_and_emits_nothing() {
    let mut called = false;
    let options = Options::new("z.", 60, ClassCode::IN);
    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| {
        called = true;
        Ok(0)
    };
    let err = parse_string(b"bad A 256.0.0.1\n", options, &mut cache, &mut sink).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }), "{err}");
    assert_eq!(err.code(), -5);
    assert!(!called);
}

#[test]
fn unterminated_quote_is_syntax() {
    let err = parse_zone("a TXT \"hello", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Syntax { .. }), "{err}");
    assert_eq!(err.code(), -4);
}

#[test]
fn owner_ttl_class_inheritance() {
    let zone = "\
$ORIGIN z.\n\
a 100 IN A 192.0.2.1\n\
  A 192.0.2.2\n\
b CH 200 A 192.0.2.3\n\
  TXT inherit\n";
    let rrs = parse_zone(zone, "example.", 60).unwrap();
    assert_eq!(rrs.len(), 4);
    // leading whitespace: owner inherited from the previous record
    assert_eq!(rrs[1].owner, rrs[0].owner);
    assert_eq!(rrs[1].ttl, 100);
    assert_eq!(rrs[1].class, 1);
    // class and TTL in either order
    assert_eq!(rrs[2].class, ClassCode::CH.0);
    assert_eq!(rrs[2].ttl, 200);
    // both inherited by the blank-owner record
    assert_eq!(rrs[3].owner, rrs[2].owner);
    assert_eq!(rrs[3].class, ClassCode::CH.0);
    assert_eq!(rrs[3].ttl, 200);
}

#[test]
fn multi_line_soa_with_group() {
    let zone = "\
@ IN SOA ns hostmaster (\n\
      2024010101 ; serial\n\
      3h         ; refresh\n\
      1h         ; retry\n\
      1w         ; expire\n\
      5m )       ; minimum\n";
    let rrs = parse_zone(zone, "example.", 60).unwrap();
    assert_eq!(rrs.len(), 1);
    assert_eq!(rrs[0].rtype, 6);
    let rdata = &rrs[0].rdata;
    let counters = &rdata[rdata.len() - 20..];
    assert_eq!(&counters[0..4], &2024010101u32.to_be_bytes());
    assert_eq!(&counters[4..8], &(3 * 3600u32).to_be_bytes());
    assert_eq!(&counters[16..20], &300u32.to_be_bytes());
}

#[test]
fn blank_lines_and_comment_only_lines_are_ignored() {
    let zone = "\n; comment only\n   ; indented comment\n\na A 192.0.2.1\n\n";
    let rrs = parse_zone(zone, "z.", 60).unwrap();
    assert_eq!(rrs.len(), 1);
}

#[test]
fn record_without_type_is_semantic() {
    for zone in ["a\n", "a 300\n", "a 300 IN\n"] {
        let err = parse_zone(zone, "z.", 60).unwrap_err();
        assert!(matches!(err, ZoneError::Semantic { .. }), "{zone:?}: {err}");
    }
}

#[test]
fn record_without_rdata_is_semantic() {
    let err = parse_zone("a A\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));
}

#[test]
fn unknown_type_without_generic_form_is_semantic() {
    let err = parse_zone("a TYPE999 1.2.3.4\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));

    let err = parse_zone("a BOGUSTYPE 1.2.3.4\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));
}

#[test]
fn duplicate_ttl_is_semantic() {
    let err = parse_zone("a 100 200 A 192.0.2.1\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));
}

#[test]
fn ttl_out_of_range_is_semantic() {
    let err = parse_zone("a 2147483648 A 192.0.2.1\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));
}

#[test]
fn stray_close_paren_is_syntax() {
    let err = parse_zone("a A 192.0.2.1 )\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Syntax { .. }));
}

#[test]
fn unbalanced_open_paren_at_eof_is_syntax() {
    let err = parse_zone("a A ( 192.0.2.1\n", "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Syntax { .. }));
}

#[test]
fn sink_abort_code_is_surfaced_verbatim() {
    let options = Options::new("z.", 60, ClassCode::IN);
    let mut cache = Cache::new(1);
    let mut seen = 0u32;
    let mut sink = |_: &Record<'_>| {
        seen += 1;
        if seen == 2 { Err(-42) } else { Ok(0) }
    };
    let zone = b"a A 192.0.2.1\nb A 192.0.2.2\nc A 192.0.2.3\n";
    let err = parse_string(zone, options, &mut cache, &mut sink).unwrap_err();
    assert!(matches!(err, ZoneError::Sink(-42)));
    assert_eq!(err.code(), -42);
    assert_eq!(seen, 2);
}

#[test]
fn sink_slot_out_of_range_is_a_parameter_error() {
    let options = Options::new("z.", 60, ClassCode::IN);
    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(7);
    let err = parse_string(b"a A 192.0.2.1\n", options, &mut cache, &mut sink).unwrap_err();
    assert!(matches!(err, ZoneError::BadParameter(_)));
}

#[test]
fn cache_blocks_remain_readable_after_parse() {
    let options = Options::new("z.", 60, ClassCode::IN);
    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(0);
    parse_string(b"host A 192.0.2.9\n", options, &mut cache, &mut sink).unwrap();
    assert_eq!(cache.owner(0).as_wire(), b"\x04host\x01z\x00");
    assert_eq!(cache.rdata(0).as_slice(), b"\xC0\x00\x02\x09");
}

#[test]
fn owner_and_name_caps_are_enforced() {
    let label64 = "a".repeat(64);
    let err = parse_zone(&format!("{label64} A 192.0.2.1\n"), "z.", 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));

    let label63 = "a".repeat(63);
    let long_origin = format!("{label63}.{label63}.{label63}.");
    let err = parse_zone(&format!("{label63}.xx A 192.0.2.1\n"), &long_origin, 60).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));
}

#[test]
fn escaped_owner_names_keep_dots() {
    let rrs = parse_zone("a\\.b A 192.0.2.1\n", "z.", 60).unwrap();
    assert_eq!(rrs[0].owner, b"\x03a.b\x01z\x00");
}

#[test]
fn duration_syntax_works_in_ttl_position() {
    let zone = "\
a 1h30m IN A 192.0.2.1\n\
b A 192.0.2.2\n\
$TTL 2h\n\
c A 192.0.2.3\n";
    let rrs = parse_zone(zone, "z.", 60).unwrap();
    assert_eq!(rrs[0].ttl, 5400);
    // omitted TTL inherits the last-seen value
    assert_eq!(rrs[1].ttl, 5400);
    // which $TTL replaces
    assert_eq!(rrs[2].ttl, 7200);
}

#[test]
fn ttl_directive_applies_to_later_records() {
    let rrs = parse_zone("$TTL 2h\na A 192.0.2.1\n", "z.", 60).unwrap();
    assert_eq!(rrs[0].ttl, 7200);
}

#[test]
fn log_callback_receives_the_error_report() {
    let messages: Rc<RefCell<Vec<(LogCategory, String)>>> = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&messages);
    let mut options = Options::new("z.", 60, ClassCode::IN);
    options.log.write = Some(Box::new(move |category, message| {
        captured.borrow_mut().push((category, message.to_string()));
    }));
    options.log.categories = LogCategories::all();

    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(0);
    let err = parse_string(b"bad A 999.0.0.1\n", options, &mut cache, &mut sink).unwrap_err();
    assert!(matches!(err, ZoneError::Semantic { .. }));

    let messages = messages.borrow();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, LogCategory::Error);
    assert!(messages[0].1.contains("<string>:1:"), "{}", messages[0].1);
}

#[test]
fn disabled_log_category_suppresses_the_report() {
    let messages: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&messages);
    let mut options = Options::new("z.", 60, ClassCode::IN);
    options.log.write = Some(Box::new(move |_, message| {
        captured.borrow_mut().push(message.to_string());
    }));
    options.log.categories = LogCategories::INFO;

    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(0);
    parse_string(b"bad A 999.0.0.1\n", options, &mut cache, &mut sink).unwrap_err();
    assert!(messages.borrow().is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let options = Options::new("z.", 60, ClassCode::IN);
    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(0);
    let err = zone_record::parse_file(
        "/nonexistent/db.zone",
        options,
        &mut cache,
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, ZoneError::Io(_)));
    assert_eq!(err.code(), -2);
}

#[test]
fn every_emitted_owner_is_canonical() {
    let zone = "\
$ORIGIN deep.example.\n\
www 300 IN A 192.0.2.1\n\
a.b.c 300 IN TXT probe\n\
@ 300 IN NS ns\n";
    let rrs = parse_zone(zone, "x.", 60).unwrap();
    for rr in &rrs {
        let wire = &rr.owner;
        assert!(wire.len() <= 255);
        // walk labels; must terminate with the root label exactly at the end
        let mut at = 0;
        loop {
            let len = wire[at] as usize;
            assert!(len <= 63);
            at += 1 + len;
            if len == 0 {
                break;
            }
        }
        assert_eq!(at, wire.len());
    }
    assert_eq!(rrs[0].rtype, TypeCode::A.0);
}
