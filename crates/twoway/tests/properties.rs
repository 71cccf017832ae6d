use proptest::prelude::*;
use twoway::primitive::catalog::CATALOG;
use twoway::{CipherError, TwoWayCipher};

fn cipher_name() -> impl Strategy<Value = &'static str> {
    (0..CATALOG.len()).prop_map(|i| CATALOG[i].name)
}

proptest! {
    #[test]
    fn round_trips_under_every_cipher(
        name in cipher_name(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..200),
        password in proptest::collection::vec(any::<u8>(), 0..40),
        mac in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut cipher = TwoWayCipher::new(Some(name), None).unwrap();
        cipher.set_password(&password);
        cipher.set_mac(&mac);

        let sealed = cipher.encrypt(&plaintext).unwrap();
        prop_assert_eq!(sealed.tag.is_some(), cipher.is_advanced());

        let decrypted = cipher.decrypt(&sealed.ciphertext, sealed.tag.as_deref()).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn same_inputs_same_output(
        name in cipher_name(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let cipher = TwoWayCipher::new(Some(name), None).unwrap();
        prop_assert_eq!(cipher.encrypt(&plaintext).unwrap(), cipher.encrypt(&plaintext).unwrap());
    }

    #[test]
    fn iv_of_wrong_length_is_rejected(name in cipher_name(), len in 0usize..40) {
        let mut cipher = TwoWayCipher::new(Some(name), None).unwrap();
        let before = cipher.iv().map(<[u8]>::to_vec);
        let result = cipher.set_iv(&vec![7u8; len]);

        if len == cipher.iv_length() {
            prop_assert!(result.is_ok());
        } else {
            let rejected = matches!(result, Err(CipherError::InvalidIvLength { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(cipher.iv().map(<[u8]>::to_vec), before);
        }
    }
}
