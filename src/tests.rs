use crate::*;
use pretty_hex::PrettyHex;
use proptest::prelude::*;
use std::sync::Arc;

fn ints(values: &[i128]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

#[test]
fn end_to_end_big_endian() {
    let mut w = Writer::new(Endian::Big);
    assert_eq!(w.u8(&[5]), [0x05]);
    assert_eq!(w.u16(&[10, 20]), [0x00, 0x0a, 0x00, 0x14]);
    assert_eq!(w.string("ascii", &["AB"]).unwrap(), [b"AB".as_slice()]);
    assert_eq!(w.data(), hex::decode("05000a00144142").unwrap());

    println!("{}", w.data().hex_dump());

    let mut r = Reader::new(w.data(), Endian::Big);
    assert_eq!(r.read_field(FieldKind::U8, 1), Ok(Fields::Scalar(Value::Int(5))));
    assert_eq!(
        r.read_field(FieldKind::U16, 2),
        Ok(Fields::Sequence(ints(&[10, 20])))
    );
    assert_eq!(r.string(2, "ascii").unwrap(), "AB");
    assert_eq!(r.offset(), 7);
    assert!(r.is_empty());
}

#[test]
fn basic_u8() {
    let mut r = Reader::new(&[42, 43, 44], Endian::Native);
    assert_eq!(r.u8(), Ok(42));
    assert_eq!(r.offset(), 1);
    assert_eq!(r.remaining(), 2);
}

#[test]
fn read_past_end_leaves_offset() {
    let mut r = Reader::new(&[0x33, 0x44, 0x55], Endian::Little);
    assert_eq!(r.u16(), Ok(0x4433));
    let err = r.u16().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(r.offset(), 2);
    assert_eq!(r.u8(), Ok(0x55));

    assert_eq!(
        r.u8(),
        Err(Error::OutOfBounds {
            offset: 3,
            delta: 1,
            available: 3
        })
    );
    assert_eq!(r.offset(), 3);
}

#[test]
fn failed_sequence_read_is_atomic() {
    let mut r = Reader::new(&[1, 2, 3, 4, 5], Endian::Little);
    assert!(r.read_n::<u16>(3).is_err());
    assert!(r.read_field(FieldKind::U32, 2).is_err());
    assert_eq!(r.offset(), 0);
    assert_eq!(r.read_n::<u16>(2), Ok(vec![0x0201, 0x0403]));
}

#[test]
fn scalar_and_sequence() {
    let data = [0x01, 0x00, 0x02, 0x00];
    let mut r = Reader::new(&data, Endian::Little);
    let pair = r.read_field(FieldKind::U16, 2).unwrap();

    let mut r2 = Reader::new(&data, Endian::Little);
    let first = r2.read_field(FieldKind::U16, 1).unwrap();
    let second = r2.read_field(FieldKind::U16, 1).unwrap();
    assert_eq!(first, Fields::Scalar(Value::Int(1)));
    assert_eq!(
        pair.into_vec(),
        [first.into_vec(), second.into_vec()].concat()
    );
    assert_eq!(r.offset(), r2.offset());
}

#[test]
fn zero_count_is_empty_sequence() {
    let mut r = Reader::new(&[], Endian::Big);
    assert_eq!(r.read_field(FieldKind::I64, 0), Ok(Fields::Sequence(vec![])));
    assert_eq!(r.read_n::<f32>(0), Ok(vec![]));
    assert_eq!(r.offset(), 0);
}

#[test]
fn byte_orders() {
    let cases: &[(Endian, [u8; 4])] = &[
        (Endian::Little, [0x04, 0x03, 0x02, 0x01]),
        (Endian::Big, [0x01, 0x02, 0x03, 0x04]),
        (Endian::Network, [0x01, 0x02, 0x03, 0x04]),
        (Endian::Native, 0x01020304u32.to_ne_bytes()),
        (Endian::NativeUnaligned, 0x01020304u32.to_ne_bytes()),
    ];

    for &(endian, bytes) in cases {
        let mut w = Writer::new(endian);
        assert_eq!(w.u32(&[0x01020304]), bytes, "endian = {endian}");

        let mut r = Reader::new(&bytes, endian);
        assert_eq!(r.u32(), Ok(0x01020304), "endian = {endian}");
    }
}

#[test]
fn endian_change_only_affects_later_fields() {
    let mut w = Writer::new(Endian::Little);
    w.u16(&[0x0102]);
    w.set_endian(Endian::Big);
    w.u16(&[0x0102]);
    assert_eq!(w.data(), [0x02, 0x01, 0x01, 0x02]);

    let mut r = Reader::new(w.data(), Endian::Little);
    assert_eq!(r.u16(), Ok(0x0102));
    r.set_endian(Endian::Big);
    assert_eq!(r.u16(), Ok(0x0102));
}

#[test]
fn signed_and_float_fields() {
    let mut w = Writer::new(Endian::Little);
    w.i8(&[-1]);
    w.i16(&[-2]);
    w.i32(&[-3]);
    w.i64(&[-4]);
    w.f32(&[1.5]);
    w.f64(&[-0.25]);
    assert_eq!(w.len(), 1 + 2 + 4 + 8 + 4 + 8);

    let mut r = Reader::new(w.data(), Endian::Little);
    assert_eq!(r.i8(), Ok(-1));
    assert_eq!(r.i16(), Ok(-2));
    assert_eq!(r.i32(), Ok(-3));
    assert_eq!(r.i64(), Ok(-4));
    assert_eq!(r.f32(), Ok(1.5));
    assert_eq!(r.f64(), Ok(-0.25));
    assert!(r.is_empty());
}

#[test]
fn extreme_integers() {
    let mut w = Writer::new(Endian::Big);
    w.write_field(FieldKind::U64, &[Value::from(u64::MAX)])
        .unwrap();
    w.write_field(FieldKind::I64, &[Value::from(i64::MIN)])
        .unwrap();

    let mut r = Reader::new(w.data(), Endian::Big);
    assert_eq!(
        r.read_field(FieldKind::U64, 1),
        Ok(Fields::Scalar(Value::Int(u64::MAX.into())))
    );
    assert_eq!(r.i64(), Ok(i64::MIN));
}

#[test]
fn pad() {
    let mut w = Writer::new(Endian::Little);
    w.u8(&[1]);
    w.pad(3);
    w.u8(&[2]);
    assert_eq!(w.data(), [1, 0, 0, 0, 2]);

    let mut r = Reader::new(w.data(), Endian::Little);
    r.pad(4).unwrap();
    assert_eq!(r.u8(), Ok(2));
    assert!(r.pad(1).is_err());
    assert_eq!(r.offset(), 5);
}

#[test]
fn write_out_of_range() {
    let mut w = Writer::new(Endian::Big);
    w.u8(&[7]);

    let err = w
        .write_field(FieldKind::U8, &ints(&[1, 300]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(
        err,
        Error::Range {
            value: Value::Int(300),
            field: "u8".to_string()
        }
    );

    assert!(w.write_field(FieldKind::U16, &ints(&[-1])).is_err());
    assert!(w.write_field(FieldKind::I8, &ints(&[-129])).is_err());
    assert!(w.write_field(FieldKind::I32, &[Value::Float(1.0)]).is_err());
    assert!(w.write_field(FieldKind::F32, &[Value::Float(1e300)]).is_err());
    assert!(w.write_field(FieldKind::U8, &[Value::Bytes(vec![1])]).is_err());
    assert_eq!(w.data(), [7]);

    // Non-finite floats and integers are accepted by float fields.
    w.write_field(FieldKind::F32, &[Value::Float(f64::INFINITY), Value::Int(3)])
        .unwrap();
    let mut r = Reader::new(w.data(), Endian::Big);
    r.pad(1).unwrap();
    assert_eq!(r.read_n::<f32>(2), Ok(vec![f32::INFINITY, 3.0]));
}

#[test]
fn len_prefixed_round_trip() {
    for n in [0usize, 1, 255] {
        let values: Vec<Value> = (0..n).map(|i| Value::from(i as i16 - 100)).collect();
        let mut w = Writer::new(Endian::Little);
        let pieces = w
            .len_prefixed(Prefix::U8, FieldKind::I16, &values)
            .unwrap();
        assert_eq!(pieces.length, [n as u8]);
        assert_eq!(pieces.elements.len(), n * 2);
        assert_eq!(w.len(), 1 + n * 2);

        let mut r = Reader::new(w.data(), Endian::Little);
        assert_eq!(r.len_prefixed(Prefix::U8, FieldKind::I16), Ok(values));
        assert!(r.is_empty());
    }
}

#[test]
fn len_prefixed_overflow() {
    let values = vec![Value::Int(0); 256];
    let mut w = Writer::new(Endian::Little);
    let err = w
        .len_prefixed(Prefix::U8, FieldKind::U8, &values)
        .unwrap_err();
    assert_eq!(
        err,
        Error::LengthOverflow {
            count: 256,
            prefix: Prefix::U8
        }
    );
    assert_eq!(err.kind(), ErrorKind::Range);
    assert!(w.is_empty());

    // A 16-bit prefix can count them.
    w.len_prefixed(Prefix::U16, FieldKind::U8, &values).unwrap();
    assert_eq!(w.len(), 2 + 256);
}

#[test]
fn len_prefixed_bad_element_writes_nothing() {
    let mut w = Writer::new(Endian::Little);
    assert!(w
        .len_prefixed(Prefix::U32, FieldKind::U8, &ints(&[1, 2, 256]))
        .is_err());
    assert!(w.is_empty());
}

#[test]
fn len_prefixed_typed() {
    let mut w = Writer::new(Endian::Big);
    let pieces = w.len_prefixed_of::<u32>(Prefix::U16, &[1, 2]).unwrap();
    assert_eq!(pieces.length, [0x00, 0x02]);
    assert_eq!(pieces.elements, [0, 0, 0, 1, 0, 0, 0, 2]);

    let mut r = Reader::new(w.data(), Endian::Big);
    assert_eq!(r.len_prefixed_of::<u32>(Prefix::U16), Ok(vec![1, 2]));
}

#[test]
fn len_prefixed_truncated_rolls_back() {
    // Claims 3 u16 elements but only holds 2.
    let data = [3, 0x01, 0x00, 0x02, 0x00];
    let mut r = Reader::new(&data, Endian::Little);
    let err = r.len_prefixed(Prefix::U8, FieldKind::U16).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(r.offset(), 0);
    assert!(r.len_prefixed_of::<u16>(Prefix::U8).is_err());
    assert_eq!(r.offset(), 0);

    assert_eq!(r.u8(), Ok(3));
}

#[test]
fn jump() {
    // A count of 3, three u16 values, a 1-byte footer, then a marker.
    let data = hex::decode("03aaaabbbbcccc00ff").unwrap();

    let mut r = Reader::new(&data, Endian::Big);
    assert_eq!(r.jump(Prefix::U8, 2, 1), Ok(3));
    assert_eq!(r.offset(), 8);
    assert_eq!(r.u8(), Ok(0xff));

    let mut r = Reader::new(&data, Endian::Big);
    assert_eq!(r.jump(Prefix::U8, 1, 0), Ok(3));
    assert_eq!(r.offset(), 4);

    // Negative tweak.
    let mut r = Reader::new(&data, Endian::Big);
    assert_eq!(r.jump(Prefix::U8, 2, -6), Ok(3));
    assert_eq!(r.offset(), 1);
}

#[test]
fn jump_out_of_bounds() {
    let data = [0x02, 0x00, 0x00];

    let mut r = Reader::new(&data, Endian::Little);
    let err = r.jump(Prefix::U8, 2, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(r.offset(), 0);

    // Before the start of the source.
    let err = r.jump(Prefix::U8, 0, -2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(r.offset(), 0);

    // Length field itself is truncated.
    let mut r = Reader::new(&data, Endian::Little);
    assert!(r.jump(Prefix::U32, 1, 0).is_err());
    assert_eq!(r.offset(), 0);

    // Arithmetic overflow.
    let data = [0xff; 8];
    let mut r = Reader::new(&data, Endian::Little);
    assert!(r.jump(Prefix::U64, u64::MAX, 0).is_err());
    assert_eq!(r.offset(), 0);
}

#[test]
fn seek() {
    let data = [1, 2, 3];
    let mut r = Reader::at(&data, 2, Endian::Little).unwrap();
    assert_eq!(r.u8(), Ok(3));
    r.set_offset(0).unwrap();
    assert_eq!(r.u8(), Ok(1));
    r.set_offset(3).unwrap();
    assert!(r.is_empty());
    assert!(r.set_offset(4).is_err());
    assert_eq!(r.offset(), 3);
    assert!(Reader::at(&data, 4, Endian::Little).is_err());
}

#[test]
fn raw_bytes() {
    let mut w = Writer::new(Endian::Little);
    let blocks = w.bytes(&[b"abc", b"", b"de"]);
    assert_eq!(blocks, [b"abc".as_slice(), b"", b"de"]);
    assert_eq!(w.data(), b"abcde");
    assert_eq!(w.data(), w.data());

    let mut r = Reader::new(w.data(), Endian::Little);
    assert_eq!(r.bytes(3), Ok(b"abc".as_slice()));
    assert!(r.bytes(3).is_err());
    assert_eq!(r.bytes(2), Ok(b"de".as_slice()));
}

#[cfg(feature = "bstr")]
#[test]
fn bstr() {
    let mut r = Reader::new(b"hi\xff", Endian::Little);
    assert_eq!(r.bstr(3).unwrap(), bstr::BStr::new(b"hi\xff"));
}

#[test]
fn data_is_idempotent() {
    let mut w = Writer::new(Endian::Big);
    w.u16(&[1]);
    let first = w.data().to_vec();
    assert_eq!(w.data(), first);
    w.u8(&[2]);
    assert_eq!(w.data(), [0, 1, 2]);
    assert_eq!(w.into_inner(), [0, 1, 2]);
}

#[test]
fn text_encodings() {
    let cases: &[(&str, Endian, &str, &[u8])] = &[
        ("utf-8", Endian::Big, "h\u{e9}", &[0x68, 0xc3, 0xa9]),
        ("latin-1", Endian::Big, "h\u{e9}", &[0x68, 0xe9]),
        ("utf-16le", Endian::Big, "hi", &[0x68, 0x00, 0x69, 0x00]),
        ("UTF-16BE", Endian::Little, "hi", &[0x00, 0x68, 0x00, 0x69]),
        ("utf-16", Endian::Big, "hi", &[0x00, 0x68, 0x00, 0x69]),
        ("utf_32le", Endian::Big, "h", &[0x68, 0, 0, 0]),
        ("utf-32", Endian::Big, "\u{1f600}", &[0x00, 0x01, 0xf6, 0x00]),
        ("utf-16le", Endian::Big, "\u{1f600}", &[0x3d, 0xd8, 0x00, 0xde]),
    ];

    for &(encoding, endian, text, bytes) in cases {
        let mut w = Writer::new(endian);
        assert_eq!(
            w.string(encoding, &[text]).unwrap(),
            [bytes],
            "encoding = {encoding}"
        );

        let mut r = Reader::new(bytes, endian);
        assert_eq!(
            r.string(bytes.len(), encoding).unwrap(),
            text,
            "encoding = {encoding}"
        );
    }
}

#[test]
fn text_byte_order_marks() {
    let mut r = Reader::new(&[0xff, 0xfe, 0x68, 0x00], Endian::Big);
    assert_eq!(r.string(4, "utf-16").unwrap(), "h");

    let mut r = Reader::new(&[0x00, 0x00, 0xfe, 0xff, 0, 0, 0, 0x68], Endian::Little);
    assert_eq!(r.string(8, "utf-32").unwrap(), "h");
}

#[test]
fn string_writes_one_block_per_argument() {
    let mut w = Writer::new(Endian::Little);
    let blocks = w.string("utf-8", &["ab", "", "c"]).unwrap();
    assert_eq!(blocks, [b"ab".as_slice(), b"", b"c"]);
    assert_eq!(w.data(), b"abc");
}

#[test]
fn invalid_text_is_consumed() {
    let data = [0x41, 0xff, 0x42];
    let mut r = Reader::new(&data, Endian::Little);
    let err = r.string(2, "ascii").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    match err {
        Error::Decode {
            encoding, position, ..
        } => {
            assert_eq!(encoding, "ascii");
            assert_eq!(position, 1);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(r.offset(), 2);
    assert_eq!(r.u8(), Ok(0x42));

    let mut r = Reader::new(&[0x00, 0xd8], Endian::Little);
    assert_eq!(
        r.string(2, "utf-16le").unwrap_err().kind(),
        ErrorKind::Decode
    );

    let mut r = Reader::new(&[0x41, 0x00, 0x42], Endian::Little);
    assert!(r.string(3, "utf-16le").is_err());
    assert_eq!(r.offset(), 3);

    let mut r = Reader::new(&[0x00, 0x00, 0x11, 0x00], Endian::Little);
    assert!(r.string(4, "utf-32le").is_err());
}

#[test]
fn unencodable_text_writes_nothing() {
    let mut w = Writer::new(Endian::Little);
    let err = w.string("ascii", &["ok", "caf\u{e9}"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert!(w.is_empty());
    assert!(w.string("latin-1", &["\u{100}"]).is_err());
    assert!(w.is_empty());
}

#[test]
fn unknown_encoding() {
    let mut r = Reader::new(b"abc", Endian::Little);
    let err = r.string(3, "ebcdic").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("ebcdic"));
    assert!(err.to_string().contains("utf8"));
    assert_eq!(r.offset(), 0);

    let mut w = Writer::new(Endian::Little);
    assert!(w.string("ebcdic", &["abc"]).is_err());
}

struct Rot13;

impl TextCodec for Rot13 {
    fn name(&self) -> &str {
        "rot13"
    }

    fn encode(&self, text: &str, _endian: Endian) -> Result<Vec<u8>> {
        Ok(text.bytes().map(rot13).collect())
    }

    fn decode(&self, bytes: &[u8], _endian: Endian) -> Result<String> {
        Ok(bytes.iter().copied().map(|b| char::from(rot13(b))).collect())
    }
}

fn rot13(b: u8) -> u8 {
    match b {
        b'a'..=b'z' => (b - b'a' + 13) % 26 + b'a',
        b'A'..=b'Z' => (b - b'A' + 13) % 26 + b'A',
        _ => b,
    }
}

#[test]
fn custom_codec() {
    let mut codecs = Codecs::new();
    codecs.register("ROT-13", Rot13);
    let codecs = Arc::new(codecs);

    let mut w = Writer::new(Endian::Little).with_codecs(codecs.clone());
    w.string("rot13", &["Hello"]).unwrap();
    assert_eq!(w.data(), b"Uryyb");

    let mut r = Reader::new(w.data(), Endian::Little).with_codecs(codecs);
    assert_eq!(r.string(5, "rot_13").unwrap(), "Hello");

    assert!(Codecs::shared().get("rot13").is_err());
    assert!(Codecs::empty().get("utf-8").is_err());
}

#[test]
fn parse_endian() {
    let cases: &[(&str, Endian)] = &[
        ("@", Endian::Native),
        ("Native", Endian::Native),
        ("=", Endian::NativeUnaligned),
        ("native-no-align", Endian::NativeUnaligned),
        ("<", Endian::Little),
        ("LITTLE_ENDIAN", Endian::Little),
        ("le", Endian::Little),
        (">", Endian::Big),
        ("big", Endian::Big),
        ("!", Endian::Network),
        ("network", Endian::Network),
    ];
    for &(s, expected) in cases {
        assert_eq!(s.parse::<Endian>(), Ok(expected), "s = {s:?}");
    }

    for endian in Endian::ALL {
        assert_eq!(Endian::try_from(endian.code()), Ok(endian));
        assert_eq!(endian.to_string().parse::<Endian>(), Ok(endian));
    }

    let err = "middle".parse::<Endian>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    let message = err.to_string();
    assert!(message.contains("\"middle\""), "{message}");
    assert!(message.contains("network"), "{message}");
    assert!(Endian::try_from('?').is_err());
}

#[test]
fn field_kind_widths() {
    assert_eq!(FieldKind::int(16, true), Ok(FieldKind::I16));
    assert_eq!(FieldKind::int(64, false), Ok(FieldKind::U64));
    assert_eq!(FieldKind::float(32), Ok(FieldKind::F32));
    assert_eq!(FieldKind::int(24, false).unwrap_err().kind(), ErrorKind::Config);
    assert!(FieldKind::float(16).is_err());
    assert_eq!(Prefix::from_bits(32), Ok(Prefix::U32));
    assert!(Prefix::from_bits(7).is_err());
    assert_eq!(Prefix::U16.max(), 65535);
}

#[test]
fn parse_format() {
    let format: Format = "B 2H x 4s d".parse().unwrap();
    assert_eq!(
        format.tokens(),
        [
            Token::Field(FieldKind::U8, 1),
            Token::Field(FieldKind::U16, 2),
            Token::Pad(1),
            Token::Bytes(4),
            Token::Field(FieldKind::F64, 1),
        ]
    );
    assert_eq!(format.value_count(), 5);
    assert_eq!(format.size(Endian::Little), 1 + 4 + 1 + 4 + 8);
    assert_eq!(format.to_string(), "B2Hx4sd");

    assert!("3".parse::<Format>().is_err());
    assert!("3 H".parse::<Format>().is_err());
    assert_eq!("z".parse::<Format>().unwrap_err().kind(), ErrorKind::Config);
}

#[test]
fn native_alignment() {
    let format: Format = "BI".parse().unwrap();
    assert_eq!(format.size(Endian::NativeUnaligned), 5);
    assert_eq!(format.size(Endian::Little), 5);
    assert_eq!(format.size(Endian::Native), 8);

    let mut w = Writer::new(Endian::Native);
    w.pack(&format, &ints(&[1, 2])).unwrap();
    let mut expected = vec![1, 0, 0, 0];
    expected.extend_from_slice(&2u32.to_ne_bytes());
    assert_eq!(w.data(), expected);

    // Padding is measured from the start of the format, not the buffer.
    let mut r = Reader::at(&[0xee, 1, 0, 0, 0, 2, 0, 0, 0], 1, Endian::Native).unwrap();
    assert_eq!(r.unpack(&"BI".parse().unwrap()).unwrap()[0], Value::Int(1));
    assert_eq!(r.offset(), 9);

    // Nothing is added after the last field.
    assert_eq!("IB".parse::<Format>().unwrap().size(Endian::Native), 5);
}

#[test]
fn pack_and_unpack() {
    let format: Format = "hx3sf".parse().unwrap();
    let values = vec![
        Value::Int(-2),
        Value::Bytes(b"abc".to_vec()),
        Value::Float(0.5),
    ];
    let mut w = Writer::new(Endian::Big);
    let packed = w.pack(&format, &values).unwrap();
    assert_eq!(packed, hex::decode("fffe006162633f000000").unwrap());

    let mut r = Reader::new(w.data(), Endian::Big);
    assert_eq!(r.unpack(&format), Ok(values));
    assert!(r.is_empty());
}

#[test]
fn pack_rejects_bad_values() {
    let format: Format = "H2s".parse().unwrap();
    let mut w = Writer::new(Endian::Big);

    let err = w.pack(&format, &ints(&[1])).unwrap_err();
    assert_eq!(
        err,
        Error::ValueCount {
            expected: 2,
            actual: 1
        }
    );
    assert!(w
        .pack(&format, &[Value::Int(1), Value::Bytes(b"abc".to_vec())])
        .is_err());
    assert!(w.pack(&format, &[Value::Int(1), Value::Int(2)]).is_err());
    assert!(w.is_empty());
}

#[test]
fn unpack_out_of_bounds() {
    let mut r = Reader::new(&[1, 2, 3], Endian::Little);
    r.pad(1).unwrap();
    assert!(r.unpack(&"Bx2s".parse().unwrap()).is_err());
    assert_eq!(r.offset(), 1);
}

fn any_endian() -> impl Strategy<Value = Endian> {
    prop::sample::select(Endian::ALL.to_vec())
}

proptest! {
    #[test]
    fn round_trip_integers(endian in any_endian(), a in any::<u16>(), b in any::<i32>(), c in any::<u64>(), d in any::<i8>()) {
        let mut w = Writer::new(endian);
        w.u16(&[a]);
        w.i32(&[b]);
        w.u64(&[c]);
        w.i8(&[d]);

        let mut r = Reader::new(w.data(), endian);
        prop_assert_eq!(r.u16(), Ok(a));
        prop_assert_eq!(r.i32(), Ok(b));
        prop_assert_eq!(r.u64(), Ok(c));
        prop_assert_eq!(r.i8(), Ok(d));
        prop_assert!(r.is_empty());
    }

    #[test]
    fn round_trip_floats(endian in any_endian(), x in any::<f32>(), y in any::<f64>()) {
        let mut w = Writer::new(endian);
        w.f32(&[x]);
        w.f64(&[y]);

        let mut r = Reader::new(w.data(), endian);
        prop_assert_eq!(r.f32().map(f32::to_bits), Ok(x.to_bits()));
        prop_assert_eq!(r.f64().map(f64::to_bits), Ok(y.to_bits()));
    }

    #[test]
    fn round_trip_arrays(endian in any_endian(), values in prop::collection::vec(any::<i16>(), 0..40)) {
        let mut w = Writer::new(endian);
        w.len_prefixed_of(Prefix::U8, &values).unwrap();
        w.i16(&values);

        let mut r = Reader::new(w.data(), endian);
        prop_assert_eq!(r.len_prefixed_of::<i16>(Prefix::U8), Ok(values.clone()));
        prop_assert_eq!(r.read_n::<i16>(values.len()), Ok(values));
        prop_assert!(r.is_empty());
    }

    #[test]
    fn offset_advances_by_field_size(data in prop::collection::vec(any::<u8>(), 0..32), kinds in prop::collection::vec(0usize..10, 1..8)) {
        let all = [
            FieldKind::U8, FieldKind::I8, FieldKind::U16, FieldKind::I16, FieldKind::U32,
            FieldKind::I32, FieldKind::U64, FieldKind::I64, FieldKind::F32, FieldKind::F64,
        ];
        let mut r = Reader::new(&data, Endian::Little);
        for i in kinds {
            let kind = all[i];
            let before = r.offset();
            match r.read_field(kind, 1) {
                Ok(_) => {
                    prop_assert_eq!(r.offset(), before + kind.size());
                }
                Err(e) => {
                    prop_assert_eq!(e.kind(), ErrorKind::OutOfBounds);
                    prop_assert_eq!(r.offset(), before);
                }
            }
        }
    }

    #[test]
    fn jump_advances_by_formula(len in 0u16..64, multiplier in 0u64..4, tweak in -2i64..3, tail in 0usize..300) {
        let mut w = Writer::new(Endian::Big);
        w.u16(&[len]);
        w.pad(tail);

        let mut r = Reader::new(w.data(), Endian::Big);
        let target = 2 + i64::from(len) * multiplier as i64 + tweak;
        match r.jump(Prefix::U16, multiplier, tweak) {
            Ok(n) => {
                prop_assert_eq!(n, u64::from(len));
                prop_assert_eq!(r.offset() as i64, target);
            }
            Err(e) => {
                prop_assert_eq!(e.kind(), ErrorKind::OutOfBounds);
                prop_assert!(target < 0 || target > w.len() as i64);
                prop_assert_eq!(r.offset(), 0);
            }
        }
    }
}
