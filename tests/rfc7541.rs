//! RFC 7541 Appendix C block sequences and cross-codec properties.
//!
//! These scenarios drive an encoder and a decoder across multiple header
//! blocks on one logical connection, checking wire bytes, decoded lists,
//! and the dynamic table contents the RFC walks through.

use protocol_hpack::{Decoder, DynamicTable, Encoder, Header};

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn header(name: &str, value: &str) -> Header {
    Header::new(name.as_bytes(), value.as_bytes())
}

fn assert_headers(actual: &[Header], expected: &[(&str, &str)]) {
    let actual: Vec<(&[u8], &[u8])> = actual
        .iter()
        .map(|h| (h.name.as_ref(), h.value.as_ref()))
        .collect();
    let expected: Vec<(&[u8], &[u8])> = expected
        .iter()
        .map(|(n, v)| (n.as_bytes(), v.as_bytes()))
        .collect();
    assert_eq!(actual, expected);
}

fn assert_table(table: &DynamicTable, expected: &[(&str, &str)]) {
    let actual: Vec<(&[u8], &[u8])> = table
        .iter()
        .map(|e| (e.name.as_ref(), e.value.as_ref()))
        .collect();
    let expected: Vec<(&[u8], &[u8])> = expected
        .iter()
        .map(|(n, v)| (n.as_bytes(), v.as_bytes()))
        .collect();
    assert_eq!(actual, expected);
}

// Appendix C.3: three requests on one connection, no Huffman.
const REQUEST_BLOCKS_PLAIN: [&str; 3] = [
    "828684410f7777772e6578616d706c652e636f6d",
    "828684be58086e6f2d6361636865",
    "828785bf400a637573746f6d2d6b65790c637573746f6d2d76616c7565",
];

// Appendix C.4: the same requests with Huffman-coded literals.
const REQUEST_BLOCKS_HUFFMAN: [&str; 3] = [
    "828684418cf1e3c2e5f23a6ba0ab90f4ff",
    "828684be5886a8eb10649cbf",
    "828785bf408825a849e95ba97d7f8925a849e95bb8e8b4bf",
];

fn request_headers() -> [Vec<(&'static str, &'static str)>; 3] {
    [
        vec![
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.example.com"),
        ],
        vec![
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.example.com"),
            ("cache-control", "no-cache"),
        ],
        vec![
            (":method", "GET"),
            (":scheme", "https"),
            (":path", "/index.html"),
            (":authority", "www.example.com"),
            ("custom-key", "custom-value"),
        ],
    ]
}

// Appendix C.5/C.6: three responses at a 256-octet table, forcing
// evictions.
const RESPONSE_BLOCKS_HUFFMAN: [&str; 3] = [
    "488264025885aec3771a4b6196d07abe941054d444a8200595040b8166e082a62d1bff6e919d29ad171863c78f0b97c8e9ae82ae43d3",
    "4883640effc1c0bf",
    "88c16196d07abe941054d444a8200595040b8166e084a62d1bffc05a839bd9ab77ad94e7821dd7f2e6c7b335dfdfcd5b3960d5af27087f3672c1ab270fb5291f9587316065c003ed4ee5b1063d5007",
];

const RESPONSE_BLOCKS_PLAIN: [&str; 3] = [
    "4803333032580770726976617465611d4d6f6e2c203231204f637420323031332032303a31333a323120474d546e1768747470733a2f2f7777772e6578616d706c652e636f6d",
    "4803333037c1c0bf",
    "88c1611d4d6f6e2c203231204f637420323031332032303a31333a323220474d54c05a04677a69707738666f6f3d4153444a4b48514b425a584f5157454f50495541585157454f49553b206d61782d6167653d333630303b2076657273696f6e3d31",
];

fn response_headers() -> [Vec<(&'static str, &'static str)>; 3] {
    [
        vec![
            (":status", "302"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("location", "https://www.example.com"),
        ],
        vec![
            (":status", "307"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("location", "https://www.example.com"),
        ],
        vec![
            (":status", "200"),
            ("cache-control", "private"),
            ("date", "Mon, 21 Oct 2013 20:13:22 GMT"),
            ("location", "https://www.example.com"),
            ("content-encoding", "gzip"),
            ("set-cookie", "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1"),
        ],
    ]
}

fn response_tables() -> [Vec<(&'static str, &'static str)>; 3] {
    [
        vec![
            ("location", "https://www.example.com"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("cache-control", "private"),
            (":status", "302"),
        ],
        vec![
            (":status", "307"),
            ("location", "https://www.example.com"),
            ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            ("cache-control", "private"),
        ],
        vec![
            ("set-cookie", "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1"),
            ("content-encoding", "gzip"),
            ("date", "Mon, 21 Oct 2013 20:13:22 GMT"),
        ],
    ]
}

#[test]
fn c3_request_sequence_decodes() {
    let mut decoder = Decoder::new(256);
    for (hex, expected) in REQUEST_BLOCKS_PLAIN.iter().zip(request_headers()) {
        let headers = decoder.decode(&unhex(hex)).unwrap();
        assert_headers(&headers, &expected);
    }
    // ":authority" and "cache-control" were inserted; "custom-key" last.
    assert_table(
        decoder.dynamic_table(),
        &[
            ("custom-key", "custom-value"),
            ("cache-control", "no-cache"),
            (":authority", "www.example.com"),
        ],
    );
}

#[test]
fn c3_request_sequence_encodes() {
    let mut encoder = Encoder::new(256);
    for (hex, headers) in REQUEST_BLOCKS_PLAIN.iter().zip(request_headers()) {
        let mut block = Vec::new();
        for (name, value) in &headers {
            block.extend(encoder.encode_indexed(&header(name, value), false).unwrap());
        }
        assert_eq!(block, unhex(hex), "block {hex}");
    }
}

#[test]
fn c4_request_sequence_decodes() {
    let mut decoder = Decoder::new(256);
    for (hex, expected) in REQUEST_BLOCKS_HUFFMAN.iter().zip(request_headers()) {
        let headers = decoder.decode(&unhex(hex)).unwrap();
        assert_headers(&headers, &expected);
    }
}

#[test]
fn c4_request_sequence_encodes() {
    let mut encoder = Encoder::new(256);
    for (hex, headers) in REQUEST_BLOCKS_HUFFMAN.iter().zip(request_headers()) {
        let list: Vec<Header> = headers.iter().map(|(n, v)| header(n, v)).collect();
        assert_eq!(encoder.encode(&list).unwrap(), unhex(hex), "block {hex}");
    }
}

#[test]
fn c6_response_sequence_decodes_with_evictions() {
    let mut decoder = Decoder::new(256);
    let tables = response_tables();
    for ((hex, expected), table) in RESPONSE_BLOCKS_HUFFMAN
        .iter()
        .zip(response_headers())
        .zip(&tables)
    {
        let headers = decoder.decode(&unhex(hex)).unwrap();
        assert_headers(&headers, &expected);
        assert_table(decoder.dynamic_table(), table);
    }
    // Sizes the RFC lists after each response.
    assert_eq!(decoder.dynamic_table().size(), 215);
}

#[test]
fn c6_response_sequence_encodes_with_evictions() {
    let mut encoder = Encoder::new(256);
    let tables = response_tables();
    let sizes = [222usize, 222, 215];
    for (((hex, headers), table), size) in RESPONSE_BLOCKS_HUFFMAN
        .iter()
        .zip(response_headers())
        .zip(&tables)
        .zip(sizes)
    {
        let list: Vec<Header> = headers.iter().map(|(n, v)| header(n, v)).collect();
        assert_eq!(encoder.encode(&list).unwrap(), unhex(hex), "block {hex}");
        assert_table(encoder.dynamic_table(), table);
        assert_eq!(encoder.dynamic_table().size(), size);
    }
}

#[test]
fn c5_response_sequence_decodes_plain() {
    let mut decoder = Decoder::new(256);
    let tables = response_tables();
    for ((hex, expected), table) in RESPONSE_BLOCKS_PLAIN
        .iter()
        .zip(response_headers())
        .zip(&tables)
    {
        let headers = decoder.decode(&unhex(hex)).unwrap();
        assert_headers(&headers, &expected);
        assert_table(decoder.dynamic_table(), table);
    }
}

#[test]
fn resize_then_reuse_surviving_entry() {
    let mut encoder = Encoder::new(68);
    let mut decoder = Decoder::new(68);

    for headers in [[header("a", "b")], [header("b", "c")]] {
        let block = encoder.encode(&headers).unwrap();
        decoder.decode(&block).unwrap();
    }
    encoder.set_dynamic_table_max_size(63);

    let block = encoder.encode(&[header("b", "c")]).unwrap();
    // Size update encoding 63 under a 5-bit prefix, then an indexed
    // reference to the surviving dynamic entry.
    assert_eq!(block, [0x3f, 0x20, 0xbe]);

    let headers = decoder.decode(&block).unwrap();
    assert_headers(&headers, &[("b", "c")]);
    assert_table(decoder.dynamic_table(), &[("b", "c")]);
    assert_eq!(decoder.dynamic_table().max_size(), 63);
}

#[test]
fn encoder_and_decoder_tables_stay_identical() {
    let mut encoder = Encoder::new(128);
    let mut decoder = Decoder::new(128);

    let blocks: Vec<Vec<Header>> = vec![
        vec![header(":method", "GET"), header("x-session", "one")],
        vec![header("x-session", "one"), header("x-session", "two")],
        vec![
            header("x-session", "three"),
            Header::sensitive(b"cookie", b"secret=1"),
        ],
        vec![header("x-longer-name-to-evict", "some-longer-value-data")],
    ];
    for (i, headers) in blocks.iter().enumerate() {
        if i == 2 {
            encoder.set_dynamic_table_max_size(80);
        }
        let block = encoder.encode(headers).unwrap();
        let decoded = decoder.decode(&block).unwrap();
        assert_eq!(&decoded, headers);

        let enc = encoder.dynamic_table();
        let dec = decoder.dynamic_table();
        assert_eq!(enc.len(), dec.len(), "after block {i}");
        assert_eq!(enc.size(), dec.size(), "after block {i}");
        assert_eq!(enc.max_size(), dec.max_size(), "after block {i}");
        for (a, b) in enc.iter().zip(dec.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.value, b.value);
        }

        // Accounting invariant: the tracked size is the sum of entry sizes
        // and never exceeds the cap.
        let sum: usize = enc.iter().map(|e| e.size()).sum();
        assert_eq!(enc.size(), sum);
        assert!(enc.size() <= enc.max_size());
    }
}

#[test]
fn round_trip_arbitrary_blocks() {
    let mut encoder = Encoder::new(4096);
    let mut decoder = Decoder::new(4096);

    let blocks: Vec<Vec<Header>> = vec![
        vec![],
        vec![header(":status", "200"), header("content-type", "text/plain")],
        vec![
            header("x-binary", "\u{1}\u{2}\u{3}"),
            Header::new(b"x-bytes", &[0x00, 0xff, 0x80]),
            Header::sensitive(b"authorization", b"Bearer t"),
        ],
        vec![header(":status", "200"), header("content-type", "text/plain")],
    ];
    for headers in &blocks {
        let block = encoder.encode(headers).unwrap();
        let decoded = decoder.decode(&block).unwrap();
        assert_eq!(&decoded, headers);
    }
}

#[test]
fn size_update_applies_before_name_references() {
    // A name-indexed literal right after an update must resolve against the
    // table as it stands after the eviction.
    let mut encoder = Encoder::new(4096);
    let mut decoder = Decoder::new(4096);

    let block = encoder.encode(&[header("x-first", "1")]).unwrap();
    decoder.decode(&block).unwrap();
    let block = encoder.encode(&[header("x-second", "2")]).unwrap();
    decoder.decode(&block).unwrap();

    // Shrink so only the newest entry survives, then reference it by name.
    encoder.set_dynamic_table_max_size(42);
    let block = encoder.encode(&[header("x-second", "z")]).unwrap();
    let headers = decoder.decode(&block).unwrap();
    assert_headers(&headers, &[("x-second", "z")]);
    assert_table(decoder.dynamic_table(), &[("x-second", "z")]);
}
