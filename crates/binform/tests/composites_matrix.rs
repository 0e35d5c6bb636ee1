use binform::{
    ArrayCodec, BitFieldCodec, BooleanCodec, BytesCodec, Codec, CodecError, ConstantBytesCodec,
    ConstantCodec, EnumCodec, IntCodec, IntWidth, IntoCodec, ObjectCodec, RecordCodec,
    StringCodec, TextEncoding, TupleCodec, UnionCodec, Value, VarIntCodec,
};

#[test]
fn end_to_end_count_and_flag() {
    let codec = ObjectCodec::new()
        .field("count", VarIntCodec::v60())
        .field("flag", BooleanCodec);
    let value = Value::object([("count", Value::Int(300)), ("flag", Value::Bool(true))]);

    assert!(codec.is_valid(&value));
    assert_eq!(codec.byte_length(&value).unwrap(), 3);
    let bytes = codec.encode(&value).unwrap();
    assert_eq!(bytes.len(), 3);
    assert_eq!(bytes, [0x21, 0x2c, 0x01]);
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn union_nesting_and_flattening() {
    let inner = UnionCodec::new([ConstantCodec::new("a"), ConstantCodec::new("b")]);
    let nested = UnionCodec::nested([inner.into_codec(), ConstantCodec::new("c").into_codec()]);
    assert_eq!(nested.encode(&Value::from("a")).unwrap().len(), 2);

    let flat = nested.flatten();
    assert_eq!(flat.encode(&Value::from("a")).unwrap(), [0]);
    assert_eq!(flat.encode(&Value::from("b")).unwrap(), [1]);
    assert_eq!(flat.encode(&Value::from("c")).unwrap(), [2]);
    for (i, s) in ["a", "b", "c"].into_iter().enumerate() {
        assert_eq!(flat.decode(&[i as u8]).unwrap(), Value::from(s));
    }
}

#[test]
fn optional_of_union_is_never_double_tagged() {
    let codec = UnionCodec::optional(UnionCodec::new([
        StringCodec::fixed(1, TextEncoding::Utf8).into_codec(),
        IntCodec::unsigned(IntWidth::W8).into_codec(),
    ]));

    let string = codec.encode(&Value::from("z")).unwrap();
    assert_eq!(string, [0, b'z']);
    let number = codec.encode(&Value::Int(42)).unwrap();
    assert_eq!(number, [1, 42]);
    let absent = codec.encode(&Value::Undefined).unwrap();
    assert_eq!(absent, [2]);

    assert_eq!(codec.decode(&string).unwrap(), Value::from("z"));
    assert_eq!(codec.decode(&number).unwrap(), Value::Int(42));
    assert_eq!(codec.decode(&absent).unwrap(), Value::Undefined);
    assert_eq!(
        codec.encode(&Value::Bool(true)),
        Err(CodecError::NoMatchingCandidate)
    );
}

#[test]
fn union_order_decides_the_candidate() {
    let narrow_first = UnionCodec::new([
        ConstantCodec::new(0).into_codec(),
        IntCodec::unsigned(IntWidth::W8).into_codec(),
    ]);
    let general_first = UnionCodec::new([
        IntCodec::unsigned(IntWidth::W8).into_codec(),
        ConstantCodec::new(0).into_codec(),
    ]);
    assert_eq!(narrow_first.encode(&Value::Int(0)).unwrap(), [0]);
    assert_eq!(general_first.encode(&Value::Int(0)).unwrap(), [0, 0]);
}

#[test]
fn bit_field_packing() {
    let keys: Vec<String> = (0..9).map(|i| format!("f{i}")).collect();
    let codec = BitFieldCodec::new(keys.clone());
    let flags = |on: &[usize]| {
        Value::object(
            keys.iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), Value::Bool(on.contains(&i)))),
        )
    };

    assert_eq!(codec.byte_length(&flags(&[])).unwrap(), 2);
    assert_eq!(codec.encode(&flags(&[0])).unwrap(), [0x80, 0x00]);
    assert_eq!(codec.encode(&flags(&[7, 8])).unwrap(), [0x01, 0x80]);

    let others = flags(&[1, 4, 8]);
    let with_first = flags(&[0, 1, 4, 8]);
    let a = codec.encode(&others).unwrap();
    let b = codec.encode(&with_first).unwrap();
    assert_eq!(a[0] ^ b[0], 0x80);
    assert_eq!(a[1], b[1]);
    assert_eq!(codec.decode(&b).unwrap(), with_first);
}

#[test]
fn nested_structures_round_trip() {
    let point = TupleCodec::new([
        IntCodec::signed(IntWidth::W16).little_endian().into_codec(),
        IntCodec::signed(IntWidth::W16).little_endian().into_codec(),
    ]);
    let shape = ObjectCodec::new()
        .field("kind", EnumCodec::new(["line", "polygon"]))
        .field("points", ArrayCodec::variable(point))
        .field(
            "attributes",
            RecordCodec::variable(StringCodec::utf8(), UnionCodec::optional(BooleanCodec)),
        )
        .field("checksum", BytesCodec::fixed(2))
        .field("magic", ConstantBytesCodec::new(*b"SH"));

    let value = Value::object([
        ("kind", Value::from("polygon")),
        (
            "points",
            Value::Array(vec![
                Value::Array(vec![Value::Int(-3), Value::Int(4)]),
                Value::Array(vec![Value::Int(100), Value::Int(-200)]),
            ]),
        ),
        (
            "attributes",
            Value::Map(vec![
                (Value::from("filled"), Value::Bool(true)),
                (Value::from("hidden"), Value::Undefined),
            ]),
        ),
        ("checksum", Value::Bytes(vec![0xde, 0xad])),
        ("magic", Value::from(&b"SH"[..])),
    ]);

    assert!(shape.is_valid(&value));
    let bytes = shape.encode(&value).unwrap();
    assert_eq!(bytes.len(), shape.byte_length(&value).unwrap());
    assert_eq!(shape.decode(&bytes).unwrap(), value);
    assert_eq!(&bytes[bytes.len() - 2..], b"SH");
}

#[test]
fn child_errors_propagate_untouched() {
    let codec = ObjectCodec::new().field(
        "items",
        ArrayCodec::variable(IntCodec::unsigned(IntWidth::W8).range(0, 9)),
    );
    let value = Value::object([(
        "items",
        Value::Array(vec![Value::Int(1), Value::Int(12)]),
    )]);
    assert_eq!(
        codec.encode(&value),
        Err(CodecError::OutOfRange {
            value: "12".into(),
            minimum: "0".into(),
            maximum: "9".into(),
        })
    );
}

#[test]
fn encode_into_and_decode_at_offsets() {
    let codec = ObjectCodec::new()
        .field("count", VarIntCodec::v60())
        .field("flag", BooleanCodec);
    let value = Value::object([("count", Value::Int(300)), ("flag", Value::Bool(false))]);

    let mut buffer = [0xffu8; 8];
    let written = codec.encode_into(&value, &mut buffer, 4).unwrap();
    assert_eq!(written, 3);
    assert_eq!(buffer, [0xff, 0xff, 0xff, 0xff, 0x21, 0x2c, 0x00, 0xff]);

    let (decoded, end) = codec.decode_at(&buffer, 4).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(end, 7);

    assert!(matches!(
        codec.encode_into(&value, &mut buffer, 6),
        Err(CodecError::InsufficientSpace { needed: 3, available: 2 })
    ));
}
