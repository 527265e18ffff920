//! Types and traits for encoding values as statement parameters.

use colcodec_core::geometry::{
    GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use colcodec_core::types::{
    BigDecimal, BigInt, BitVec, Blob, Clob, LegacyDate, SqlDate, SqlTime, SqlTimestamp, Url, Uuid,
};
use colcodec_core::{Geometry, GeometryKind, HostValue, ZonedDateTime};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

use crate::codec::param::natural_type;
use crate::types::MySqlTime;
use crate::MySqlTypeInfo;

/// The return type of [`Encode::is_null`].
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IsNull {
    /// The value is null; no data was written.
    Yes,

    /// The value is not null.
    ///
    /// This does not mean that data was written.
    No,
}

impl IsNull {
    pub fn is_null(&self) -> bool {
        matches!(self, IsNull::Yes)
    }
}

/// A Rust type with a natural MySQL column type.
pub trait Type {
    /// The column type a value of this type is sent as when no column type is known.
    fn type_info() -> MySqlTypeInfo;
}

/// A type that can be sent as a statement parameter.
pub trait Encode: Type {
    /// The host value this is sent as, or `None` for SQL `NULL`.
    fn to_host_value(&self) -> Option<HostValue>;

    /// The column type this value is sent as.
    fn produces(&self) -> MySqlTypeInfo {
        Self::type_info()
    }

    fn is_null(&self) -> IsNull {
        if self.to_host_value().is_some() {
            IsNull::No
        } else {
            IsNull::Yes
        }
    }
}

impl<T: Type + ?Sized> Type for &T {
    fn type_info() -> MySqlTypeInfo {
        T::type_info()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn to_host_value(&self) -> Option<HostValue> {
        (**self).to_host_value()
    }

    #[inline]
    fn produces(&self) -> MySqlTypeInfo {
        (**self).produces()
    }
}

impl<T: Type> Type for Option<T> {
    fn type_info() -> MySqlTypeInfo {
        T::type_info()
    }
}

impl<T: Encode> Encode for Option<T> {
    #[inline]
    fn to_host_value(&self) -> Option<HostValue> {
        self.as_ref().and_then(Encode::to_host_value)
    }

    #[inline]
    fn produces(&self) -> MySqlTypeInfo {
        self.as_ref().map_or_else(T::type_info, Encode::produces)
    }
}

macro_rules! impl_encode {
    ($($ty:ty => $type_info:expr, |$v:ident| $host:expr;)*) => {
        $(
            impl Type for $ty {
                fn type_info() -> MySqlTypeInfo {
                    $type_info
                }
            }

            impl Encode for $ty {
                fn to_host_value(&self) -> Option<HostValue> {
                    let $v = self;
                    Some($host)
                }
            }
        )*
    };
}

impl_encode! {
    bool => MySqlTypeInfo::boolean(), |v| HostValue::Boolean(*v);
    i8 => MySqlTypeInfo::tinyint(), |v| HostValue::Byte(*v);
    i16 => MySqlTypeInfo::smallint(), |v| HostValue::Short(*v);
    i32 => MySqlTypeInfo::int(), |v| HostValue::Int(*v);
    i64 => MySqlTypeInfo::bigint(), |v| HostValue::Long(*v);

    // unsigned values travel in the next wider signed host type
    u8 => MySqlTypeInfo::tinyint().unsigned(), |v| HostValue::Short(i16::from(*v));
    u16 => MySqlTypeInfo::smallint().unsigned(), |v| HostValue::Int(i32::from(*v));
    u32 => MySqlTypeInfo::int().unsigned(), |v| HostValue::Long(i64::from(*v));
    u64 => MySqlTypeInfo::bigint().unsigned(), |v| HostValue::BigInteger(BigInt::from(*v));

    f32 => MySqlTypeInfo::float(), |v| HostValue::Float(*v);
    f64 => MySqlTypeInfo::double(), |v| HostValue::Double(*v);
    BigInt => MySqlTypeInfo::decimal(65, 0), |v| HostValue::BigInteger(v.clone());
    BigDecimal => MySqlTypeInfo::decimal(65, 30), |v| HostValue::BigDecimal(v.clone());

    str => MySqlTypeInfo::longtext(), |v| HostValue::String(v.to_owned());
    String => MySqlTypeInfo::longtext(), |v| HostValue::String(v.clone());
    Clob => MySqlTypeInfo::longtext(), |v| HostValue::Clob(v.clone());
    Url => MySqlTypeInfo::longtext(), |v| HostValue::Url(v.clone());
    [u8] => MySqlTypeInfo::longblob(), |v| HostValue::Bytes(v.to_vec());
    Vec<u8> => MySqlTypeInfo::longblob(), |v| HostValue::Bytes(v.clone());
    Blob => MySqlTypeInfo::longblob(), |v| HostValue::Blob(v.clone());
    Vec<f32> => MySqlTypeInfo::longblob(), |v| HostValue::FloatArray(v.clone());
    Uuid => MySqlTypeInfo::uuid(), |v| HostValue::Uuid(*v);

    Date => MySqlTypeInfo::date(), |v| HostValue::LocalDate(*v);
    Time => MySqlTypeInfo::time(6), |v| HostValue::LocalTime(*v);
    Duration => MySqlTypeInfo::time(6), |v| HostValue::Duration(*v);
    MySqlTime => MySqlTypeInfo::time(6), |v| HostValue::Duration(v.to_duration());
    PrimitiveDateTime => MySqlTypeInfo::datetime(6), |v| HostValue::LocalDateTime(*v);
    OffsetDateTime => MySqlTypeInfo::datetime(6), |v| HostValue::OffsetDateTime(*v);
    ZonedDateTime => MySqlTypeInfo::datetime(6), |v| HostValue::ZonedDateTime(v.clone());
    SqlDate => MySqlTypeInfo::date(), |v| HostValue::Date(v.clone());
    SqlTime => MySqlTypeInfo::time(3), |v| HostValue::Time(v.clone());
    SqlTimestamp => MySqlTypeInfo::datetime(6), |v| HostValue::Timestamp(v.clone());
    LegacyDate => MySqlTypeInfo::datetime(6), |v| HostValue::LegacyDate(*v);
}

impl Type for BitVec {
    fn type_info() -> MySqlTypeInfo {
        MySqlTypeInfo::bit(64)
    }
}

impl Encode for BitVec {
    fn to_host_value(&self) -> Option<HostValue> {
        Some(HostValue::BitSet(self.clone()))
    }

    fn produces(&self) -> MySqlTypeInfo {
        natural_type(&HostValue::BitSet(self.clone()))
    }
}

impl Type for Geometry {
    fn type_info() -> MySqlTypeInfo {
        MySqlTypeInfo::geometry(GeometryKind::Any)
    }
}

impl Encode for Geometry {
    fn to_host_value(&self) -> Option<HostValue> {
        Some(HostValue::Geometry(self.clone()))
    }

    fn produces(&self) -> MySqlTypeInfo {
        MySqlTypeInfo::geometry(self.kind())
    }
}

macro_rules! impl_encode_shape {
    ($($shape:ident),*) => {
        $(
            impl Type for $shape {
                fn type_info() -> MySqlTypeInfo {
                    MySqlTypeInfo::geometry(GeometryKind::$shape)
                }
            }

            impl Encode for $shape {
                fn to_host_value(&self) -> Option<HostValue> {
                    Some(HostValue::Geometry(Geometry::$shape(self.clone())))
                }
            }
        )*
    };
}

impl_encode_shape!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

/// A host value carries no column type of its own; it is sent as its natural type.
impl Type for HostValue {
    fn type_info() -> MySqlTypeInfo {
        MySqlTypeInfo::null()
    }
}

impl Encode for HostValue {
    fn to_host_value(&self) -> Option<HostValue> {
        Some(self.clone())
    }

    fn produces(&self) -> MySqlTypeInfo {
        natural_type(self)
    }
}
