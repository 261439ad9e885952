// View skeletons for each component kind. Each call builds a fresh tree.

use super::view::Element;

fn el(tag: &str, class: &str) -> Element {
    Element::new(tag).with_class(class)
}

pub fn page() -> Element {
    el("div", "page").with_child(
        el("div", "page__wrapper")
            .with_child(
                el("header", "header").with_child(
                    el("button", "header__basket")
                        .with_child(el("span", "header__basket-counter").with_text("0")),
                ),
            )
            .with_child(el("main", "gallery")),
    )
}

pub fn modal() -> Element {
    el("div", "modal").with_child(
        el("div", "modal__container")
            .with_child(el("button", "modal__close"))
            .with_child(el("div", "modal__content")),
    )
}

pub fn card_catalog() -> Element {
    el("button", "gallery__item")
        .with_class("card")
        .with_child(el("span", "card__category"))
        .with_child(el("h2", "card__title"))
        .with_child(el("img", "card__image"))
        .with_child(el("span", "card__price"))
}

pub fn card_preview() -> Element {
    el("div", "card")
        .with_class("card_full")
        .with_child(el("img", "card__image"))
        .with_child(
            el("div", "card__column")
                .with_child(el("span", "card__category"))
                .with_child(el("h2", "card__title"))
                .with_child(el("p", "card__text"))
                .with_child(
                    el("div", "card__row")
                        .with_child(el("button", "card__button"))
                        .with_child(el("span", "card__price")),
                ),
        )
}

pub fn card_basket() -> Element {
    el("li", "basket__item")
        .with_class("card")
        .with_class("card_compact")
        .with_child(el("span", "basket__item-index"))
        .with_child(el("span", "card__title"))
        .with_child(el("span", "card__price"))
        .with_child(el("button", "basket__item-delete").with_class("card__button"))
}

pub fn basket() -> Element {
    el("div", "basket")
        .with_child(el("h2", "modal__title").with_text("Basket"))
        .with_child(el("ul", "basket__list"))
        .with_child(
            el("div", "modal__actions")
                .with_child(el("button", "basket__button").with_text("Checkout"))
                .with_child(el("span", "basket__price")),
        )
}

pub fn order() -> Element {
    el("form", "form")
        .with_attr("name", "order")
        .with_child(
            el("div", "order__buttons")
                .with_child(
                    el("button", "button")
                        .with_attr("name", "card")
                        .with_text("Online"),
                )
                .with_child(
                    el("button", "button")
                        .with_attr("name", "cash")
                        .with_text("On delivery"),
                ),
        )
        .with_child(el("input", "form__input").with_attr("name", "address"))
        .with_child(
            el("div", "modal__actions")
                .with_child(
                    el("button", "order__button")
                        .with_attr("type", "submit")
                        .with_text("Next"),
                )
                .with_child(el("span", "form__errors")),
        )
}

pub fn contacts() -> Element {
    el("form", "form")
        .with_attr("name", "contacts")
        .with_child(el("input", "form__input").with_attr("name", "email"))
        .with_child(el("input", "form__input").with_attr("name", "phone"))
        .with_child(
            el("div", "modal__actions")
                .with_child(el("button", "button").with_attr("type", "submit").with_text("Pay"))
                .with_child(el("span", "form__errors")),
        )
}

pub fn success() -> Element {
    el("div", "order-success")
        .with_child(el("h2", "order-success__title").with_text("Order placed"))
        .with_child(el("p", "order-success__description"))
        .with_child(el("button", "order-success__close").with_text("Continue shopping"))
}
