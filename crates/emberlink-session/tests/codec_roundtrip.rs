use core::net::{Ipv4Addr, Ipv6Addr};

use emberlink_session::{
    decode, encode, Addressing, Credentials, LinkMode, NetAddr, SessionSnapshot, SNAPSHOT_LEN,
};
use proptest::prelude::*;

fn arb_credentials() -> impl Strategy<Value = Credentials> {
    (
        proptest::array::uniform32(any::<u8>()),
        proptest::collection::vec(any::<u8>(), 64),
        proptest::array::uniform6(any::<u8>()),
    )
        .prop_map(|(ssid, passphrase, bssid)| Credentials {
            ssid,
            passphrase: passphrase.try_into().unwrap(),
            bssid,
        })
}

fn arb_addressing() -> impl Strategy<Value = Addressing> {
    (any::<u32>(), any::<u32>(), any::<u32>()).prop_map(|(addr, netmask, gateway)| Addressing {
        addr: Ipv4Addr::from(addr),
        netmask: Ipv4Addr::from(netmask),
        gateway: Ipv4Addr::from(gateway),
    })
}

fn arb_net_addr() -> impl Strategy<Value = NetAddr> + Clone {
    prop_oneof![
        Just(NetAddr::Unset),
        any::<u32>().prop_map(|v| NetAddr::V4(Ipv4Addr::from(v))),
        any::<u128>().prop_map(|v| NetAddr::V6(Ipv6Addr::from(v))),
    ]
}

fn arb_mode() -> impl Strategy<Value = LinkMode> {
    prop_oneof![
        Just(LinkMode::Off),
        Just(LinkMode::Station),
        Just(LinkMode::AccessPoint),
        Just(LinkMode::StationAp),
    ]
}

fn arb_snapshot() -> impl Strategy<Value = SessionSnapshot> {
    (
        arb_credentials(),
        arb_addressing(),
        proptest::array::uniform2(arb_net_addr()),
        proptest::array::uniform2(arb_net_addr()),
        arb_mode(),
        0u8..=14,
        any::<bool>(),
    )
        .prop_map(
            |(credentials, addressing, name_servers, time_servers, mode, channel, persistent)| {
                SessionSnapshot {
                    credentials,
                    addressing,
                    name_servers,
                    time_servers,
                    mode,
                    channel,
                    persistent,
                }
            },
        )
}

proptest! {
    #[test]
    fn encode_decode_round_trips(snapshot in arb_snapshot()) {
        let bytes = encode(&snapshot);
        prop_assert_eq!(bytes.len(), SNAPSHOT_LEN);
        prop_assert_eq!(decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn any_single_bit_flip_is_rejected(
        snapshot in arb_snapshot(),
        bit in 0..SNAPSHOT_LEN * 8,
    ) {
        let mut bytes = encode(&snapshot);
        bytes[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(decode(&bytes).is_err());
    }

    #[test]
    fn arbitrary_buffers_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }
}
