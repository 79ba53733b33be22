//! Storefront operation catalog
//!
//! Every backend capability as a `const` [`OperationDescriptor`]. Adding an
//! endpoint is one line here; nothing else in the crate changes.

use crate::descriptor::{MediaFieldSpec, OperationDescriptor};

pub mod auth {
    use super::*;

    pub const LOGIN: OperationDescriptor =
        OperationDescriptor::post("auth.login", "/auth/login").anonymous();
    pub const REGISTER: OperationDescriptor =
        OperationDescriptor::post("auth.register", "/auth/register").anonymous();
    pub const FORGOT_PASSWORD: OperationDescriptor =
        OperationDescriptor::post("auth.forgot_password", "/auth/forgot-password").anonymous();
    pub const LOGOUT: OperationDescriptor =
        OperationDescriptor::post("auth.logout", "/auth/logout").no_body();
    pub const PROFILE: OperationDescriptor =
        OperationDescriptor::get("auth.profile", "/auth/profile").no_body();
    pub const CHANGE_PASSWORD: OperationDescriptor =
        OperationDescriptor::post("auth.change_password", "/auth/change-password");
}

pub mod products {
    use super::*;

    pub const MEDIA: &[MediaFieldSpec] = &[MediaFieldSpec::new("product_images")];

    pub const LIST: OperationDescriptor = OperationDescriptor::get("products.list", "/product/list");
    pub const DETAIL: OperationDescriptor =
        OperationDescriptor::post("products.detail", "/product/detail");
    pub const CREATE: OperationDescriptor =
        OperationDescriptor::post("products.create", "/product/create").multipart(MEDIA);
    pub const UPDATE: OperationDescriptor =
        OperationDescriptor::post("products.update", "/product/update").multipart(MEDIA);
    pub const DELETE: OperationDescriptor =
        OperationDescriptor::post("products.delete", "/product/delete");
    pub const UPDATE_STOCK: OperationDescriptor =
        OperationDescriptor::post("products.update_stock", "/product/update-stock");
}

pub mod collections {
    use super::*;

    pub const MEDIA: &[MediaFieldSpec] = &[MediaFieldSpec::new("collection_images")];

    pub const LIST: OperationDescriptor =
        OperationDescriptor::get("collections.list", "/collection/list");
    pub const DETAIL: OperationDescriptor =
        OperationDescriptor::post("collections.detail", "/collection/detail");
    pub const CREATE: OperationDescriptor =
        OperationDescriptor::post("collections.create", "/collection/create").multipart(MEDIA);
    pub const UPDATE: OperationDescriptor =
        OperationDescriptor::post("collections.update", "/collection/update").multipart(MEDIA);
    pub const DELETE: OperationDescriptor =
        OperationDescriptor::post("collections.delete", "/collection/delete");
    pub const ASSIGN_PRODUCTS: OperationDescriptor =
        OperationDescriptor::post("collections.assign_products", "/collection/assign-products");
}

pub mod orders {
    use super::*;

    pub const LIST: OperationDescriptor = OperationDescriptor::get("orders.list", "/order/list");
    pub const DETAIL: OperationDescriptor = OperationDescriptor::post("orders.detail", "/order/detail");
    pub const UPDATE_STATUS: OperationDescriptor =
        OperationDescriptor::post("orders.update_status", "/order/update-status");
    pub const REFUND: OperationDescriptor = OperationDescriptor::post("orders.refund", "/order/refund");
    pub const EXPORT: OperationDescriptor =
        OperationDescriptor::get("orders.export", "/order/export").binary().unpaginated();
    pub const INVOICE: OperationDescriptor =
        OperationDescriptor::get("orders.invoice", "/order/invoice").binary().unpaginated();
}

pub mod customers {
    use super::*;

    pub const LIST: OperationDescriptor =
        OperationDescriptor::get("customers.list", "/customer/list");
    pub const DETAIL: OperationDescriptor =
        OperationDescriptor::post("customers.detail", "/customer/detail");
    pub const UPDATE: OperationDescriptor =
        OperationDescriptor::post("customers.update", "/customer/update");
    pub const BLOCK: OperationDescriptor = OperationDescriptor::post("customers.block", "/customer/block");
}

pub mod files {
    use super::*;

    pub const MEDIA: &[MediaFieldSpec] = &[MediaFieldSpec::new("files")];

    pub const LIST: OperationDescriptor =
        OperationDescriptor::get("files.list", "/file/list").file_listing();
    pub const UPLOAD: OperationDescriptor =
        OperationDescriptor::post("files.upload", "/file/upload").multipart(MEDIA);
    pub const DELETE: OperationDescriptor = OperationDescriptor::post("files.delete", "/file/delete");
    pub const DOWNLOAD: OperationDescriptor =
        OperationDescriptor::get("files.download", "/file/download").binary().unpaginated();
}

pub mod store {
    use super::*;

    pub const MEDIA: &[MediaFieldSpec] = &[
        MediaFieldSpec::new("logo"),
        MediaFieldSpec::new("banner_images"),
    ];

    pub const DETAIL: OperationDescriptor =
        OperationDescriptor::get("store.detail", "/store/detail").no_body();
    pub const UPDATE: OperationDescriptor =
        OperationDescriptor::post("store.update", "/store/update").multipart(MEDIA);
    pub const UPDATE_SETTINGS: OperationDescriptor =
        OperationDescriptor::post("store.update_settings", "/store/settings");
}

pub mod exports {
    use super::*;

    pub const PRODUCTS: OperationDescriptor =
        OperationDescriptor::get("exports.products", "/export/products").binary().unpaginated();
    pub const CUSTOMERS: OperationDescriptor =
        OperationDescriptor::get("exports.customers", "/export/customers").binary().unpaginated();
    pub const ORDERS: OperationDescriptor =
        OperationDescriptor::get("exports.orders", "/export/orders").binary().unpaginated();
}

/// Every registered descriptor.
pub const ALL: &[OperationDescriptor] = &[
    auth::LOGIN,
    auth::REGISTER,
    auth::FORGOT_PASSWORD,
    auth::LOGOUT,
    auth::PROFILE,
    auth::CHANGE_PASSWORD,
    products::LIST,
    products::DETAIL,
    products::CREATE,
    products::UPDATE,
    products::DELETE,
    products::UPDATE_STOCK,
    collections::LIST,
    collections::DETAIL,
    collections::CREATE,
    collections::UPDATE,
    collections::DELETE,
    collections::ASSIGN_PRODUCTS,
    orders::LIST,
    orders::DETAIL,
    orders::UPDATE_STATUS,
    orders::REFUND,
    orders::EXPORT,
    orders::INVOICE,
    customers::LIST,
    customers::DETAIL,
    customers::UPDATE,
    customers::BLOCK,
    files::LIST,
    files::UPLOAD,
    files::DELETE,
    files::DOWNLOAD,
    store::DETAIL,
    store::UPDATE,
    store::UPDATE_SETTINGS,
    exports::PRODUCTS,
    exports::CUSTOMERS,
    exports::ORDERS,
];

/// Look a descriptor up by its operation name.
pub fn find(name: &str) -> Option<&'static OperationDescriptor> {
    ALL.iter().find(|d| d.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::XChaChaCodec;
    use crate::descriptor::{BodyKind, HttpVerb, ResponseKind};
    use crate::execution::RequestBuilder;
    use crate::types::RequestInput;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn every_descriptor_is_valid() {
        for descriptor in ALL {
            descriptor
                .validate()
                .unwrap_or_else(|e| panic!("{}: {e}", descriptor.name()));
        }
    }

    #[test]
    fn binary_operations_carry_no_paging() {
        let builder = RequestBuilder::new(Arc::new(XChaChaCodec::new(&[4u8; 32]).unwrap()));

        let export = builder.build(&exports::ORDERS, &RequestInput::new()).unwrap();
        assert_eq!(export.path_and_query(), "/export/orders");

        let download = builder
            .build(&files::DOWNLOAD, &RequestInput::new().with_field("id", 5))
            .unwrap();
        assert_eq!(download.path_and_query(), "/file/download?id=5");

        for descriptor in ALL.iter().filter(|d| d.response() == ResponseKind::Binary) {
            assert!(!descriptor.is_paginated(), "{} pages", descriptor.name());
        }
    }

    #[test]
    fn names_and_routes_are_unique() {
        let names: HashSet<_> = ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names.len(), ALL.len());
        let routes: HashSet<_> = ALL.iter().map(|d| (d.verb(), d.path())).collect();
        assert_eq!(routes.len(), ALL.len());
    }

    #[test]
    fn only_auth_entry_points_are_anonymous() {
        let anonymous: Vec<_> = ALL
            .iter()
            .filter(|d| !d.requires_auth())
            .map(|d| d.name())
            .collect();
        assert_eq!(anonymous, ["auth.login", "auth.register", "auth.forgot_password"]);
    }

    #[test]
    fn shapes_follow_the_capability() {
        assert_eq!(products::LIST.verb(), HttpVerb::Get);
        assert_eq!(products::LIST.body(), BodyKind::Query);
        assert_eq!(products::UPDATE.body(), BodyKind::Multipart);
        assert_eq!(files::LIST.default_limit(), 50);
        assert_eq!(orders::LIST.default_limit(), 10);
        assert_eq!(exports::ORDERS.response(), ResponseKind::Binary);
        assert_eq!(find("store.update"), Some(&store::UPDATE));
        assert_eq!(find("nope"), None);
    }
}
