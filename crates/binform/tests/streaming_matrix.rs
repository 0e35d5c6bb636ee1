use binform::stream::{
    decode_stream, encode_stream, DecodeOutcome, DecodeStream, DecoderOptions, EncodeSink,
    EncoderOptions, StreamDecoder,
};
use binform::{
    BooleanCodec, Codec, CodecError, IntCodec, IntWidth, IntoCodec, ObjectCodec, StringCodec,
    Value, VarIntCodec,
};
use bytes::Bytes;
use futures::channel::mpsc;
use futures::executor::block_on;
use futures::{stream, SinkExt, StreamExt, TryStreamExt};

fn record_codec() -> binform::CodecRef {
    ObjectCodec::new()
        .field("count", VarIntCodec::v60())
        .field("flag", BooleanCodec)
        .into_codec()
}

fn record(count: i64, flag: bool) -> Value {
    Value::object([("count", Value::Int(count)), ("flag", Value::Bool(flag))])
}

#[test]
fn three_values_from_one_chunk() {
    let codec = IntCodec::unsigned(IntWidth::W32).big_endian();
    let one = codec.encode(&Value::Int(0xdead_beef)).unwrap();
    let chunk = [one.clone(), one.clone(), one].concat();

    let chunks = stream::iter(vec![Ok::<_, CodecError>(chunk)]);
    let values: Vec<Value> = block_on(decode_stream(codec, chunks).try_collect()).unwrap();
    assert_eq!(values, vec![Value::Int(0xdead_beef); 3]);
}

#[test]
fn byte_at_a_time_delivery() {
    let codec = record_codec();
    let values = vec![record(1, true), record(300, false), record(70_000, true)];
    let wire: Vec<u8> = values
        .iter()
        .flat_map(|v| codec.encode(v).unwrap())
        .collect();

    let chunks = stream::iter(wire.into_iter().map(|b| Ok::<_, CodecError>(vec![b])));
    let decoded: Vec<Value> = block_on(decode_stream(codec, chunks).try_collect()).unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn sink_pipeline_preserves_order_and_bytes() {
    let codec = record_codec();
    let values: Vec<Value> = (0..20).map(|i| record(i * 1000, i % 3 == 0)).collect();

    let (tx, rx) = mpsc::channel::<Bytes>(2);
    let tx = tx.sink_map_err(|e| CodecError::Custom(e.to_string()));
    let options = EncoderOptions {
        max_chunk_size: Some(2),
        ..EncoderOptions::default()
    };
    let mut sink = EncodeSink::with_options(codec.clone(), tx, options);

    let produce = async {
        for value in values.clone() {
            sink.send(value).await.unwrap();
        }
        sink.close().await.unwrap();
    };
    let consume = DecodeStream::new(codec.clone(), rx.map(Ok::<_, CodecError>)).try_collect::<Vec<_>>();
    let ((), decoded) = block_on(futures::future::join(produce, consume));
    assert_eq!(decoded.unwrap(), values);
}

#[test]
fn encode_stream_matches_whole_buffer_encoding() {
    let codec = StringCodec::utf8().into_codec();
    let values = vec![Value::from("alpha"), Value::from(""), Value::from("γ")];
    let chunks: Vec<Bytes> =
        block_on(encode_stream(codec.clone(), stream::iter(values.clone())).try_collect()).unwrap();
    for (chunk, value) in chunks.iter().zip(&values) {
        assert_eq!(chunk.as_ref(), codec.encode(value).unwrap().as_slice());
    }
}

#[test]
fn truncated_input_is_reported_at_end() {
    let codec = record_codec();
    let mut wire = codec.encode(&record(5, true)).unwrap();
    wire.extend_from_slice(&[0x21]);
    let chunks = stream::iter(vec![Ok::<_, CodecError>(wire)]);
    let out: Vec<Result<Value, CodecError>> = block_on(decode_stream(codec, chunks).collect());
    assert_eq!(
        out,
        vec![Ok(record(5, true)), Err(CodecError::TruncatedStream(1))]
    );
}

#[test]
fn dropping_between_values_keeps_buffer_whole() {
    let codec = record_codec();
    let mut decoder = StreamDecoder::with_options(
        codec.clone(),
        DecoderOptions {
            warn_buffer_size: 1024,
            ..DecoderOptions::default()
        },
    );
    let wire = codec.encode(&record(300, true)).unwrap();
    decoder.push(&wire[..2]);
    assert_eq!(decoder.decode_next().unwrap(), DecodeOutcome::Incomplete);
    assert_eq!(decoder.buffered(), 2);
    decoder.push(&wire[2..]);
    assert_eq!(
        decoder.decode_next().unwrap(),
        DecodeOutcome::Complete(record(300, true))
    );
    assert_eq!(decoder.buffered(), 0);
}
