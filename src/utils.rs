use crate::prelude::*;

macro_rules! impl_le_bytes {
    ($($num:ty),*) => {
        $(
            impl LeBytes for $num {
                const SIZE: usize = std::mem::size_of::<$num>();

                fn from_slice(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut arr = [0; std::mem::size_of::<$num>()];
                    arr.copy_from_slice(&bytes[0..Self::SIZE]);
                    match order {
                        ByteOrder::LittleEndian => <$num>::from_le_bytes(arr),
                        ByteOrder::BigEndian => <$num>::from_be_bytes(arr),
                    }
                }

                fn extend_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_le_bytes!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

fn decode_as<T: LeBytes>(bytes: &[u8], order: ByteOrder, out: &mut Vec<f64>) {
    for chunk in bytes.chunks_exact(T::SIZE) {
        let value = T::from_slice(chunk, order);
        out.push(num_traits::cast::<T, f64>(value).unwrap_or(f64::NAN));
    }
}

/// convert raw bytes of a given precision into floats. Trailing bytes that do not make up a
/// full value are ignored.
pub(crate) fn bytes_to_floats(bytes: &[u8], precision: Precision, order: ByteOrder) -> Vec<f64> {
    let mut out = Vec::with_capacity(bytes.len() / precision.size());

    match precision {
        Precision::Int8 => decode_as::<i8>(bytes, order, &mut out),
        Precision::UInt8 => decode_as::<u8>(bytes, order, &mut out),
        Precision::Int16 => decode_as::<i16>(bytes, order, &mut out),
        Precision::UInt16 => decode_as::<u16>(bytes, order, &mut out),
        Precision::Int32 => decode_as::<i32>(bytes, order, &mut out),
        Precision::UInt32 => decode_as::<u32>(bytes, order, &mut out),
        Precision::Int64 => decode_as::<i64>(bytes, order, &mut out),
        Precision::UInt64 => decode_as::<u64>(bytes, order, &mut out),
        Precision::Float32 => decode_as::<f32>(bytes, order, &mut out),
        Precision::Float64 => decode_as::<f64>(bytes, order, &mut out),
    }

    out
}

fn encode_as<T: LeBytes, I: Iterator<Item = f64>>(values: I, out: &mut Vec<u8>) {
    for value in values {
        // values that do not fit the target type (NaN in an integer array) are written as zero
        let value: T = num_traits::cast(value).unwrap_or_default();
        value.extend_le(out);
    }
}

/// convert floats into little endian bytes of the given precision
pub(crate) fn floats_to_bytes<I: Iterator<Item = f64>>(
    values: I,
    precision: Precision,
    size_hint: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(size_hint * precision.size());

    match precision {
        Precision::Int8 => encode_as::<i8, _>(values, &mut out),
        Precision::UInt8 => encode_as::<u8, _>(values, &mut out),
        Precision::Int16 => encode_as::<i16, _>(values, &mut out),
        Precision::UInt16 => encode_as::<u16, _>(values, &mut out),
        Precision::Int32 => encode_as::<i32, _>(values, &mut out),
        Precision::UInt32 => encode_as::<u32, _>(values, &mut out),
        Precision::Int64 => encode_as::<i64, _>(values, &mut out),
        Precision::UInt64 => encode_as::<u64, _>(values, &mut out),
        Precision::Float32 => encode_as::<f32, _>(values, &mut out),
        Precision::Float64 => encode_as::<f64, _>(values, &mut out),
    }

    out
}

/// format a float the shortest way that still round-trips
pub(crate) fn format_float(value: f64, precision: Precision) -> String {
    if precision.is_float() {
        let mut buffer = ryu::Buffer::new();
        match precision {
            Precision::Float32 => buffer.format(value as f32).to_string(),
            _ => buffer.format(value).to_string(),
        }
    } else {
        // integers are written without a trailing `.0`
        format!("{}", value.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_float_roundtrip_through_bytes() {
        let values = [1.0, -2.0, 300.0];
        let bytes = floats_to_bytes(values.iter().copied(), Precision::Int16, 3);
        assert_eq!(bytes.len(), 6);
        assert_eq!(
            bytes_to_floats(&bytes, Precision::Int16, ByteOrder::LittleEndian),
            values
        );

        let bytes = floats_to_bytes(values.iter().copied(), Precision::Float32, 3);
        assert_eq!(
            bytes_to_floats(&bytes, Precision::Float32, ByteOrder::LittleEndian),
            values
        );
    }

    #[test]
    fn big_endian_values() {
        let bytes = 1.5f64.to_be_bytes();
        let out = bytes_to_floats(&bytes, Precision::Float64, ByteOrder::BigEndian);
        assert_eq!(out, vec![1.5]);
    }

    #[test]
    fn nan_in_integer_array_is_zero() {
        let bytes = floats_to_bytes([f64::NAN].into_iter(), Precision::UInt8, 1);
        assert_eq!(bytes, vec![0]);
    }

    #[test]
    fn integer_formatting() {
        assert_eq!(format_float(3.0, Precision::Int64), "3");
        assert_eq!(format_float(0.5, Precision::Float64), "0.5");
    }
}
